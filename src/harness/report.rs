use serde::Serialize;
use crate::harness::Comparison;

#[derive(Debug, Serialize)]
pub struct ComparisonRecord {
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub memory_gas: usize,
    pub storage_gas: usize,
    pub memory_wins: bool,
}

/// Everything one run measured, ready to print or serialize.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub deploy_gas: usize,
    pub sanity_gas: usize,
    pub comparisons: Vec<ComparisonRecord>,
}

impl Report {
    pub fn record(&mut self, scenario: &str, bound: Option<u64>, offset: Option<u64>, comparison: Comparison) {
        self.comparisons.push(ComparisonRecord {
            scenario: scenario.to_string(),
            bound,
            offset,
            memory_gas: comparison.memory_gas,
            storage_gas: comparison.storage_gas,
            memory_wins: comparison.memory_wins(),
        });
    }

    /// True when memory came out cheaper in every recorded scenario.
    pub fn all_hold(&self) -> bool {
        self.comparisons.iter().all(|c| c.memory_wins)
    }
}
