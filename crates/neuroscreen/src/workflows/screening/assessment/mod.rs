mod config;
mod recommendations;
mod rules;

pub use config::ScoringConfig;
pub use recommendations::RiskLevel;

use serde::Serialize;

/// Stateless scorer applying the configured thresholds to a finished session.
///
/// Fully deterministic: the same inputs always yield the same assessment.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, input: AssessmentInput) -> RiskAssessment {
        let memory_score = rules::memory_score(input.recalled_words);
        let risk_score = rules::risk_score(memory_score, input.puzzle_score, input.age, &self.config);
        let risk_level = RiskLevel::from_score(risk_score, &self.config);

        RiskAssessment {
            risk_score,
            risk_level,
            memory_score,
            puzzle_score: input.puzzle_score,
            age_factor: input.age,
            recommendations: risk_level.recommendations().to_vec(),
        }
    }
}

/// The slice of session state the risk calculation consumes.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentInput {
    pub age: u32,
    pub recalled_words: usize,
    pub puzzle_score: u8,
}

/// Result of one completed screening; produced exactly once per session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub memory_score: u8,
    pub puzzle_score: u8,
    pub age_factor: u32,
    pub recommendations: Vec<&'static str>,
}
