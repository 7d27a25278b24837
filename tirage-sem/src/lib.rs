//! Runtime semantics of Tirage.
//!
//! A model function is an ordinary Rust function that constructs random
//! variables. Wrapped in a [`ModelTemplate`], it can be re-executed under
//! different *capture contexts*:
//! - a [`ForwardContext`] records every variable in construction order and
//!   lets each one keep its freely sampled value;
//! - an [`InferenceContext`] rebinds the variables it expects to externally
//!   supplied values, so that the sum of log-probabilities can be evaluated
//!   at an arbitrary point of the parameter space.
//!
//! The model function never learns that it is being observed: variable
//! construction registers with whatever context is currently on top of the
//! thread-local stack in [`capture`].
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tirage_sem::{capture, ModelTemplate, RandomVariable};
//!
//! // A miniature numerical backend: a variable pinned to a triangle density.
//! struct Tent {
//!     name: String,
//!     value: Cell<f64>,
//! }
//! impl RandomVariable for Tent {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!     fn value(&self) -> f64 {
//!         self.value.get()
//!     }
//!     fn bind(&self, value: f64) {
//!         self.value.set(value);
//!     }
//!     fn log_prob(&self) -> f64 {
//!         -self.value.get().abs()
//!     }
//! }
//! fn tent(name: &str) -> Rc<Tent> {
//!     let var = Rc::new(Tent { name: name.to_owned(), value: Cell::new(0.0) });
//!     capture::register(var.clone());
//!     var
//! }
//!
//! let template = ModelTemplate::new(|| {
//!     let _x = tent("x");
//!     let _y = tent("y");
//! });
//! let model = template.configure();
//! assert_eq!(model.variable_names(), ["x", "y"]);
//! let log_prob = model.log_prob_function();
//! assert_eq!(log_prob(&[1.0, -2.0]).unwrap(), -3.0);
//! ```

#![warn(
    missing_docs,
    unused_crate_dependencies,
    clippy::pedantic,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_docs_in_private_items,
    clippy::str_to_string,
    clippy::unreachable,
    clippy::unwrap_used,
    clippy::use_debug
)]

pub mod capture;
pub mod model;
pub mod trace;
pub mod variable;

pub use capture::{CaptureContext, EvalError, ForwardContext, InferenceContext, Scope};
pub use model::{Model, ModelTemplate};
pub use trace::Trace;
pub use variable::{RandomVariable, Var};
