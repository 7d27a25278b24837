//! Model templates and configured models.
//!
//! A [`ModelTemplate`] is the inert wrapper around a user function; it does
//! nothing until [`configure`](ModelTemplate::configure) evaluates the
//! function once under a fresh [`ForwardContext`] to discover the model's
//! variable structure. The resulting [`Model`] owns that context snapshot:
//! structure may legitimately differ between templates built with different
//! arguments, so the snapshot is per-model, never template-wide.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::capture::{self, CaptureContext, EvalError, ForwardContext, InferenceContext};
use crate::trace::Trace;

/// An unconfigured, reusable model function.
///
/// Immutable after construction: the builder methods consume and return by
/// value and are only meant for the code generated by `#[model]`.
#[derive(Clone)]
pub struct ModelTemplate {
    /// The (possibly rewritten) model function, arguments already bound by
    /// closure capture.
    func: Rc<dyn Fn()>,
    /// Whether the auto-name rewrite was applied to the function body.
    auto_named: bool,
    /// Trace destination threaded into every evaluation.
    trace: Trace,
}

impl ModelTemplate {
    /// Wrap a model function.
    pub fn new(func: impl Fn() + 'static) -> Self {
        Self {
            func: Rc::new(func),
            auto_named: false,
            trace: Trace::Off,
        }
    }

    /// Record that the auto-name rewrite was applied.
    #[must_use]
    pub fn auto_named(mut self, auto_named: bool) -> Self {
        self.auto_named = auto_named;
        self
    }

    /// Set the trace destination for evaluations of this template.
    #[must_use]
    pub fn traced(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    /// Whether the auto-name rewrite was applied.
    #[must_use]
    pub fn is_auto_named(&self) -> bool {
        self.auto_named
    }

    /// Evaluate the template once under a forward context and return the
    /// configured [`Model`].
    ///
    /// This is the only place a template's variable structure is discovered.
    #[must_use]
    pub fn configure(&self) -> Model {
        let context = Rc::new(ForwardContext::with_trace(self.trace));
        {
            let _scope = capture::enter(context.clone());
            (self.func)();
        }
        Model {
            template: self.clone(),
            forward: context,
            observations: BTreeMap::new(),
        }
    }
}

/// One configured instantiation of a template.
///
/// Cheap to clone: the template function and the forward context are shared,
/// only the observation map is owned per model.
#[derive(Clone)]
pub struct Model {
    /// The template this model was configured from.
    template: ModelTemplate,
    /// Context populated by the configuring evaluation.
    forward: Rc<ForwardContext>,
    /// Observed data for external inference drivers to consult. The core
    /// records it and hands it out; it does not enforce it.
    observations: BTreeMap<String, f64>,
}

impl Model {
    /// Realized value of every captured variable, by name.
    ///
    /// A pure read of the forward context populated at configuration time;
    /// the template is not re-executed.
    #[must_use]
    pub fn forward_sample(&self) -> BTreeMap<String, f64> {
        self.forward
            .captured()
            .iter()
            .map(|var| (var.name().to_owned(), var.value()))
            .collect()
    }

    /// A self-contained log-probability function over the model's variables.
    ///
    /// Each call opens a fresh [`InferenceContext`] expecting the variables of
    /// this model's forward run, re-evaluates the template function under it
    /// (re-running all control flow), and sums the captured variables'
    /// log-probabilities. Values correspond positionally to
    /// [`variable_names`](Self::variable_names). Safe to call repeatedly;
    /// calls share nothing but the name ordering contract.
    pub fn log_prob_function(&self) -> impl Fn(&[f64]) -> Result<f64, EvalError> {
        let func = Rc::clone(&self.template.func);
        let expected = self.forward.names();
        let trace = self.template.trace;
        move |values: &[f64]| {
            let context = Rc::new(InferenceContext::with_trace(
                expected.clone(),
                values.to_vec(),
                trace,
            )?);
            {
                let _scope = capture::enter(context.clone());
                func();
            }
            Ok(context.captured().iter().map(|var| var.log_prob()).sum())
        }
    }

    /// Derive a model with additional observations.
    ///
    /// Copy-on-write: the receiver is untouched, the returned model shares the
    /// template and forward context and owns an extended observation map.
    #[must_use]
    pub fn observe<N: Into<String>>(&self, observations: impl IntoIterator<Item = (N, f64)>) -> Self {
        let mut derived = self.clone();
        derived
            .observations
            .extend(observations.into_iter().map(|(name, value)| (name.into(), value)));
        derived
    }

    /// The observation map accumulated through [`observe`](Self::observe).
    #[must_use]
    pub fn observations(&self) -> &BTreeMap<String, f64> {
        &self.observations
    }

    /// Names of the captured variables, in construction order.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        self.forward.names()
    }
}
