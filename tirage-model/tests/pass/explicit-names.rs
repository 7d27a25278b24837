//! A model with hand-written names, no rewrite involved.

use tirage::prelude::*;

#[model]
fn coin(bias: f64) {
    let _flip = Bernoulli::new(bias).named("flip");
}

fn main() {
    let model = coin(0.5).configure();
    assert_eq!(model.variable_names(), ["flip"]);
    let sample = model.forward_sample();
    let value = sample["flip"];
    assert!(value == 0.0 || value == 1.0);
}
