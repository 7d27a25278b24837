//! The auto-name rewrite end to end: identifiers become variable names and
//! the log-probability function rebinds them.

use tirage::prelude::*;

#[model(auto_name)]
fn regression() {
    let slope = Normal::new(0.0, 1.0);
    let intercept = Normal::new(0.0, 10.0);
    let _noise = HalfNormal::new(1.0);
    let _ = (slope, intercept);
}

fn main() {
    let model = regression().configure();
    assert_eq!(model.variable_names(), ["slope", "intercept", "_noise"]);

    let log_prob = model.log_prob_function();
    let total = log_prob(&[0.5, -2.0, 1.0]).unwrap();
    let expected = Normal::new(0.0, 1.0).log_density(0.5)
        + Normal::new(0.0, 10.0).log_density(-2.0)
        + HalfNormal::new(1.0).log_density(1.0);
    assert!((total - expected).abs() < 1e-12);

    // Wrong arity is refused before anything is evaluated.
    assert!(log_prob(&[0.5]).is_err());
}
