use serde::{Deserialize, Serialize};

/// Thresholds backing the risk calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Ages strictly above this add one age adjustment.
    pub senior_age: u32,
    /// Ages strictly above this add a second, cumulative adjustment.
    pub elder_age: u32,
    /// Risk points added per crossed age threshold.
    pub age_adjustment: u8,
    /// Risk scores strictly above this are classified high.
    pub high_threshold: u8,
    /// Risk scores strictly above this (and at or below `high_threshold`) are moderate.
    pub moderate_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            senior_age: 65,
            elder_age: 75,
            age_adjustment: 10,
            high_threshold: 60,
            moderate_threshold: 30,
        }
    }
}
