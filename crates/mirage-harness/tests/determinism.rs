//! Reproducibility of seeded runs.

use std::time::Duration;

use mirage_app::UiAction;
use mirage_harness::Sim;

fn scripted_run(seed: u64) -> Vec<UiAction> {
    let mut sim = Sim::new(seed);
    sim.login("neo@matrix.io", "pw");
    sim.run_for(Duration::from_secs(120), Duration::from_millis(500));
    sim.send("what is the matrix?");
    sim.run_for(Duration::from_secs(60), Duration::from_millis(500));
    sim.take_actions()
}

#[test]
fn same_seed_and_schedule_reproduce_the_exact_action_log() {
    assert_eq!(scripted_run(42), scripted_run(42));
}

#[test]
fn different_seeds_diverge() {
    // Session and message ids alone guarantee divergence.
    assert_ne!(scripted_run(1), scripted_run(2));
}
