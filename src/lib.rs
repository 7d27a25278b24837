//! Tirage: reusable probabilistic model objects from plain Rust functions.
//!
//! Write a function that constructs random variables, put `#[model]` on it,
//! and you get back a constructor for a [`ModelTemplate`]: an inert, reusable
//! description of the model. Configuring a template evaluates the function
//! once under a recording context and yields a [`Model`] that supports
//! forward sampling and log-probability evaluation; the function itself never
//! learns that it is being observed.
//!
//! ```
//! use tirage::prelude::*;
//!
//! #[model(auto_name)]
//! fn eruption() {
//!     let duration = Normal::new(3.5, 1.0);
//!     let _wait = Normal::new(20.0 * duration.value(), 5.0);
//! }
//!
//! let model = eruption().configure();
//! assert_eq!(model.variable_names(), ["duration", "_wait"]);
//!
//! // Forward samples are a pure read of the configured evaluation.
//! let sample = model.forward_sample();
//! assert_eq!(sample.len(), 2);
//!
//! // The log-probability function re-runs the model with values rebound.
//! let log_prob = model.log_prob_function();
//! let expected = Normal::new(3.5, 1.0).log_density(3.0)
//!     + Normal::new(60.0, 5.0).log_density(58.0);
//! let total = log_prob(&[3.0, 58.0]).unwrap();
//! assert!((total - expected).abs() < 1e-12);
//!
//! // Conditioning is copy-on-write; the base model is untouched.
//! let conditioned = model.observe([("_wait", 70.0)]);
//! assert!(model.observations().is_empty());
//! assert_eq!(conditioned.observations().len(), 1);
//! ```
//!
//! The pieces live in their own crates and are re-exported here:
//! - `tirage-model`: the [`model`] attribute;
//! - `tirage-syn`: the decompile → parse → transform → recompile pipeline
//!   behind `auto_name`;
//! - `tirage-sem`: capture contexts, templates and models;
//! - `tirage-std`: a minimal distribution backend. Any type implementing
//!   [`RandomVariable`] can replace it.

#![warn(
    missing_docs,
    unused_crate_dependencies,
    clippy::pedantic,
    clippy::missing_docs_in_private_items
)]

pub use tirage_model::model;
pub use tirage_sem::{
    capture, CaptureContext, EvalError, ForwardContext, InferenceContext, Model, ModelTemplate,
    RandomVariable, Scope, Trace, Var,
};
pub use tirage_std as dist;

/// Everything a model file usually needs.
pub mod prelude {
    pub use tirage_model::model;
    pub use tirage_sem::{EvalError, Model, ModelTemplate, RandomVariable, Trace};
    pub use tirage_std::{Bernoulli, Density, HalfNormal, Named, Normal, Sample, Uniform};
}
