//! The variable type of this backend.

use std::cell::Cell;
use std::rc::Rc;

use tirage_sem::{capture, RandomVariable};

/// A scalar distribution: how to sample it and how to score a value.
pub trait Density {
    /// Sample one value.
    fn draw(&self) -> f64;

    /// Log-density of `value`. Values outside the support score
    /// `f64::NEG_INFINITY`.
    fn log_density(&self, value: f64) -> f64;
}

/// A realized random variable: a density, a name, and a current value.
///
/// The value cell starts at a fresh draw and is overwritten when an inference
/// context rebinds the variable.
pub struct Sample<D: Density> {
    /// Stable variable name.
    name: String,
    /// Current realized value.
    value: Cell<f64>,
    /// The distribution this variable was drawn from.
    density: D,
}

impl<D: Density> Sample<D> {
    /// The distribution this variable was drawn from.
    pub fn density(&self) -> &D {
        &self.density
    }
}

impl<D: Density> RandomVariable for Sample<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        self.value.get()
    }

    fn bind(&self, value: f64) {
        self.value.set(value);
    }

    fn log_prob(&self) -> f64 {
        self.density.log_density(self.value.get())
    }
}

/// Construction entry point: realize a distribution as a named variable.
///
/// Blanket-implemented for every `Density`, so model code reads
/// `Normal::new(0.0, 1.0).named("x")`, or just `Normal::new(0.0, 1.0)` under
/// `#[model(auto_name)]`, which injects the `.named(...)` call.
pub trait Named: Density + Sized + 'static {
    /// Draw a value, wrap it as a variable, and register it with the current
    /// capture context. Registration is a side effect of construction; model
    /// code never registers anything explicitly.
    ///
    /// # Panics
    /// When called outside of a model evaluation (no active capture context).
    fn named(self, name: impl Into<String>) -> Rc<Sample<Self>> {
        let var = Rc::new(Sample {
            name: name.into(),
            value: Cell::new(self.draw()),
            density: self,
        });
        capture::register(var.clone());
        var
    }
}

impl<D: Density + Sized + 'static> Named for D {}
