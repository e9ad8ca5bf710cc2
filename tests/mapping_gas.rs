//! End-to-end run at the default sizes: deploy, sanity-check, then compare
//! the two backings on every scenario.

use gasmap::harness::{Comparison, Harness};

fn assert_memory_wins(scenario: &str, comparison: Comparison) {
    eprintln!("{scenario}: mem {} gas / storage {} gas", comparison.memory_gas, comparison.storage_gas);
    assert!(comparison.memory_wins(),
        "{scenario}: mem {} gas should undercut storage {} gas",
        comparison.memory_gas, comparison.storage_gas);
}

#[test]
fn memory_mapping_beats_storage_at_default_sizes() {
    let (mut harness, receipt) = Harness::deploy(30_000_000).expect("deployment should succeed");
    eprintln!("deployed in {} gas", receipt.gas_used);

    let sanity = harness.sanity_check().expect("the sanity test should pass");
    eprintln!("sanity test used {} gas", sanity.gas_used);

    assert_memory_wins("single", harness.compare_single().expect("single comparison should run"));
    assert_memory_wins("extended", harness.compare_extended(60, None).expect("extended comparison should run"));
    assert_memory_wins("extended2", harness.compare_many_reads(150, None).expect("extended2 comparison should run"));
}
