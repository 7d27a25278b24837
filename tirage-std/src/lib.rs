//! A minimal numerical backend for Tirage.
//!
//! The core only requires the [`tirage_sem::RandomVariable`] contract; this
//! crate is the smallest realization of it that makes models runnable:
//! a [`Density`] describes a scalar distribution, [`Sample`] is the variable
//! type realizing one, and [`Named::named`] is the construction entry point
//! that the auto-name rewrite targets.
//!
//! ```
//! use std::rc::Rc;
//! use tirage_sem::{capture, ForwardContext, RandomVariable};
//! use tirage_std::{Density, Named, Normal};
//!
//! let context = Rc::new(ForwardContext::new());
//! let _scope = capture::enter(context.clone());
//! let x = Normal::new(0.0, 1.0).named("x");
//! assert_eq!(context.names(), ["x"]);
//! assert_eq!(x.log_prob(), Normal::new(0.0, 1.0).log_density(x.value()));
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

pub mod dist;
pub mod sample;

pub use dist::{Bernoulli, HalfNormal, Normal, Uniform};
pub use sample::{Density, Named, Sample};
