//! The contract required from the numerical backend.
//!
//! The capture machinery consumes random variables, it does not own them:
//! a backend constructs its variable, wraps it in an [`Rc`] and hands a clone
//! to [`capture::register`](crate::capture::register) as part of construction.
//! From then on the core only ever reads the variable through this trait.

use std::rc::Rc;

/// One realized random quantity of a model.
///
/// Log-probabilities are already reduced to a scalar by the backend; the core
/// only sums them.
pub trait RandomVariable {
    /// Stable name of the variable. Inference relies on name correspondence,
    /// so two variables of one evaluation should not share a name.
    fn name(&self) -> &str;

    /// The realized value.
    fn value(&self) -> f64;

    /// Force the realized value, discarding whatever was sampled.
    ///
    /// Called by an [`InferenceContext`](crate::capture::InferenceContext)
    /// at registration time, before any log-probability is read.
    fn bind(&self, value: f64);

    /// Log-probability of the current realized value.
    fn log_prob(&self) -> f64;
}

/// Shared handle to a captured variable.
pub type Var = Rc<dyn RandomVariable>;
