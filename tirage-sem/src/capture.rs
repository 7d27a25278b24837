//! The capture-context stack.
//!
//! One thread-local stack of contexts is shared by every model evaluation on
//! the thread. [`enter`] pushes a frame and returns a [`Scope`] guard whose
//! `Drop` pops it again, so the stack unwinds correctly on every exit path,
//! including a panic in the middle of a model function. Nesting is legal: a
//! model that configures a sub-model pushes a second frame on top, and the
//! inner frame's captures never leak into the outer one.
//!
//! Registration always targets the top of the stack and nothing below it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::trace::Trace;
use crate::variable::Var;

thread_local! {
    /// The active contexts of this thread, innermost last.
    static STACK: RefCell<Vec<Rc<dyn CaptureContext>>> = RefCell::new(Vec::new());
}

/// A runtime evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// An inference context was handed a value tuple whose length does not
    /// match its list of expected variables. Caught eagerly at context
    /// construction so it cannot surface later as a silently wrong binding.
    ContextMismatch {
        /// Number of expected variable names.
        expected: usize,
        /// Number of provided values.
        provided: usize,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ContextMismatch { expected, provided } => write!(
                f,
                "inference context expects {expected} variables but was given {provided} values"
            ),
        }
    }
}

impl std::error::Error for EvalError {}

/// A frame of the capture stack.
///
/// The two variants differ only in what happens at registration time;
/// everything else (ordering, nesting, scoped push/pop) is shared.
pub trait CaptureContext {
    /// A variable was just constructed while this context was current.
    fn register(&self, var: Var);

    /// Snapshot of the captured variables, in construction order.
    fn captured(&self) -> Vec<Var>;
}

/// Records every constructed variable and lets it sample freely.
pub struct ForwardContext {
    /// Captured variables, construction order.
    vars: RefCell<Vec<Var>>,
    /// Trace destination.
    trace: Trace,
}

impl ForwardContext {
    /// An untraced forward context.
    #[must_use]
    pub fn new() -> Self {
        Self::with_trace(Trace::Off)
    }

    /// A forward context tracing each capture to `trace`.
    #[must_use]
    pub fn with_trace(trace: Trace) -> Self {
        Self {
            vars: RefCell::new(Vec::new()),
            trace,
        }
    }

    /// Names of the captured variables, in construction order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.vars.borrow().iter().map(|v| v.name().to_owned()).collect()
    }
}

impl Default for ForwardContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureContext for ForwardContext {
    fn register(&self, var: Var) {
        self.trace
            .line(format_args!("forward: {} <- {}", var.name(), var.value()));
        self.vars.borrow_mut().push(var);
    }

    fn captured(&self) -> Vec<Var> {
        self.vars.borrow().clone()
    }
}

/// Rebinds expected variables to externally supplied values.
///
/// `expected` and `provided` correspond positionally; the pair is validated to
/// have equal length at construction. A variable whose name is not in
/// `expected` is captured unbound with its freely sampled value: model control
/// flow may legally construct more variables than the originally observed run
/// did, and rejecting them here would rule out data-dependent models.
pub struct InferenceContext {
    /// Ordered names this evaluation is expected to construct.
    expected: Vec<String>,
    /// Values to force, one per expected name.
    provided: Vec<f64>,
    /// Captured variables, construction order.
    vars: RefCell<Vec<Var>>,
    /// Trace destination.
    trace: Trace,
}

impl InferenceContext {
    /// An untraced inference context.
    ///
    /// # Errors
    /// [`EvalError::ContextMismatch`] when `expected` and `provided` differ in
    /// length.
    pub fn new(expected: Vec<String>, provided: Vec<f64>) -> Result<Self, EvalError> {
        Self::with_trace(expected, provided, Trace::Off)
    }

    /// An inference context tracing each rebind to `trace`.
    ///
    /// # Errors
    /// [`EvalError::ContextMismatch`] when `expected` and `provided` differ in
    /// length.
    pub fn with_trace(
        expected: Vec<String>,
        provided: Vec<f64>,
        trace: Trace,
    ) -> Result<Self, EvalError> {
        if expected.len() != provided.len() {
            return Err(EvalError::ContextMismatch {
                expected: expected.len(),
                provided: provided.len(),
            });
        }
        Ok(Self {
            expected,
            provided,
            vars: RefCell::new(Vec::new()),
            trace,
        })
    }
}

impl CaptureContext for InferenceContext {
    fn register(&self, var: Var) {
        let position = self.expected.iter().position(|name| name == var.name());
        match position.and_then(|i| self.provided.get(i)) {
            Some(value) => {
                var.bind(*value);
                self.trace
                    .line(format_args!("inference: {} := {}", var.name(), value));
            }
            None => {
                self.trace
                    .line(format_args!("inference: {} unbound", var.name()));
            }
        }
        self.vars.borrow_mut().push(var);
    }

    fn captured(&self) -> Vec<Var> {
        self.vars.borrow().clone()
    }
}

/// Guard of one stack frame. Pops its frame when dropped.
#[must_use = "dropping the scope immediately deactivates the context"]
pub struct Scope {
    /// Stack depth right after the push; checked against at pop time.
    depth: usize,
}

/// Push `context` onto the stack of the current thread.
///
/// The frame stays current until the returned [`Scope`] is dropped.
pub fn enter(context: Rc<dyn CaptureContext>) -> Scope {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(context);
        Scope { depth: stack.len() }
    })
}

impl Drop for Scope {
    fn drop(&mut self) {
        STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(
                stack.len(),
                self.depth,
                "capture scopes must be dropped in LIFO order"
            );
            stack.pop();
        });
    }
}

/// The context a variable constructed right now would register with.
#[must_use]
pub fn current() -> Option<Rc<dyn CaptureContext>> {
    STACK.with(|stack| stack.borrow().last().map(Rc::clone))
}

/// Is any evaluation in progress on this thread?
#[must_use]
pub fn is_active() -> bool {
    STACK.with(|stack| !stack.borrow().is_empty())
}

/// Register a freshly constructed variable with the current context.
///
/// Backends call this from their variable constructors, making registration a
/// side effect of construction rather than an explicit step in model code.
///
/// # Panics
/// When no context is active. Constructing a random variable outside of a
/// model evaluation is a contract violation by the caller of the backend and
/// there is no meaningful way to continue.
pub fn register(var: Var) {
    match current() {
        Some(context) => context.register(var),
        None => panic!(
            "random variable `{}` constructed outside of a model evaluation \
             (no active capture context)",
            var.name()
        ),
    }
}
