//! The trace option only adds output; semantics are unchanged.

use tirage::prelude::*;

#[model(auto_name, trace(stdout))]
fn noisy() {
    let _level = Uniform::new(-1.0, 1.0);
}

fn main() {
    let model = noisy().configure();
    let sample = model.forward_sample();
    let level = sample["_level"];
    assert!((-1.0..1.0).contains(&level));
}
