//! Scalar distributions with analytic log-densities.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::sample::Density;

/// ln(2π), the constant term of the normal log-density.
const LN_2PI: f64 = 1.837_877_066_409_345_3;

/// Normal distribution over the whole real line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// Location.
    mu: f64,
    /// Scale, strictly positive.
    sigma: f64,
}

impl Normal {
    /// A normal distribution with mean `mu` and standard deviation `sigma`.
    ///
    /// # Panics
    /// When `sigma` is not strictly positive.
    #[must_use]
    pub fn new(mu: f64, sigma: f64) -> Self {
        assert!(sigma > 0.0, "Normal: sigma must be strictly positive");
        Self { mu, sigma }
    }
}

impl Density for Normal {
    fn draw(&self) -> f64 {
        let z: f64 = rand::thread_rng().sample(StandardNormal);
        self.mu + self.sigma * z
    }

    fn log_density(&self, value: f64) -> f64 {
        let z = (value - self.mu) / self.sigma;
        -0.5 * z * z - self.sigma.ln() - 0.5 * LN_2PI
    }
}

/// Normal distribution folded onto the non-negative half-line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfNormal {
    /// Scale, strictly positive.
    sigma: f64,
}

impl HalfNormal {
    /// A half-normal distribution with scale `sigma`.
    ///
    /// # Panics
    /// When `sigma` is not strictly positive.
    #[must_use]
    pub fn new(sigma: f64) -> Self {
        assert!(sigma > 0.0, "HalfNormal: sigma must be strictly positive");
        Self { sigma }
    }
}

impl Density for HalfNormal {
    fn draw(&self) -> f64 {
        let z: f64 = rand::thread_rng().sample(StandardNormal);
        (self.sigma * z).abs()
    }

    fn log_density(&self, value: f64) -> f64 {
        if value < 0.0 {
            return f64::NEG_INFINITY;
        }
        let z = value / self.sigma;
        // Twice the density of the positive half of a Normal(0, sigma).
        0.5 * (2.0 / std::f64::consts::PI).ln() - self.sigma.ln() - 0.5 * z * z
    }
}

/// Uniform distribution on a half-open interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    /// Inclusive lower bound.
    low: f64,
    /// Exclusive upper bound.
    high: f64,
}

impl Uniform {
    /// A uniform distribution on `[low, high)`.
    ///
    /// # Panics
    /// When the interval is empty or reversed.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        assert!(low < high, "Uniform: low must be below high");
        Self { low, high }
    }
}

impl Density for Uniform {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(self.low..self.high)
    }

    fn log_density(&self, value: f64) -> f64 {
        if value < self.low || value >= self.high {
            f64::NEG_INFINITY
        } else {
            -(self.high - self.low).ln()
        }
    }
}

/// Bernoulli distribution over `{0.0, 1.0}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    /// Success probability.
    p: f64,
}

impl Bernoulli {
    /// A Bernoulli distribution with success probability `p`.
    ///
    /// # Panics
    /// When `p` is outside `[0, 1]`.
    #[must_use]
    pub fn new(p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "Bernoulli: p must be in [0, 1]");
        Self { p }
    }
}

impl Density for Bernoulli {
    fn draw(&self) -> f64 {
        if rand::thread_rng().gen::<f64>() < self.p {
            1.0
        } else {
            0.0
        }
    }

    fn log_density(&self, value: f64) -> f64 {
        if value == 1.0 {
            self.p.ln()
        } else if value == 0.0 {
            (1.0 - self.p).ln()
        } else {
            f64::NEG_INFINITY
        }
    }
}
