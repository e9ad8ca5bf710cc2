//! Short walks with a small key offset, the cheapest configuration in the
//! suite.

use gasmap::harness::{Comparison, Harness};

fn assert_memory_wins(scenario: &str, comparison: Comparison) {
    eprintln!("{scenario}: mem {} gas / storage {} gas", comparison.memory_gas, comparison.storage_gas);
    assert!(comparison.memory_wins(),
        "{scenario}: mem {} gas should undercut storage {} gas",
        comparison.memory_gas, comparison.storage_gas);
}

#[test]
fn memory_mapping_beats_storage_on_short_shifted_walks() {
    let (mut harness, _) = Harness::deploy(30_000_000).expect("deployment should succeed");
    harness.sanity_check().expect("the sanity test should pass");

    assert_memory_wins("single", harness.compare_single().expect("single comparison should run"));
    assert_memory_wins("extended", harness.compare_extended(12, Some(7)).expect("extended comparison should run"));
    assert_memory_wins("extended2", harness.compare_many_reads(25, Some(7)).expect("extended2 comparison should run"));
}
