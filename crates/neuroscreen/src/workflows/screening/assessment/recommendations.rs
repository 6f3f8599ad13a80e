use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Categorical bucket derived from the numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    pub(crate) fn from_score(risk_score: u8, config: &ScoringConfig) -> Self {
        if risk_score > config.high_threshold {
            Self::High
        } else if risk_score > config.moderate_threshold {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Next-step product copy shown with every assessment at this level.
    pub const fn recommendations(self) -> &'static [&'static str] {
        match self {
            Self::Low => &[
                "Continue maintaining a healthy lifestyle with regular physical and mental exercise",
                "Schedule routine check-ups with your healthcare provider",
                "Consider annual cognitive health screenings",
            ],
            Self::Moderate => &[
                "Schedule an appointment with your primary care physician for further evaluation",
                "Consider consulting a neurologist for comprehensive assessment",
                "Engage in cognitive training activities and brain health exercises",
            ],
            Self::High => &[
                "Consult with a healthcare professional as soon as possible",
                "Request a referral to a neurologist or memory clinic for comprehensive evaluation",
                "Bring these results to your medical appointment",
            ],
        }
    }

    /// Plain-language explanation of what the level means.
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Low => {
                "Your screening results suggest a low risk for cognitive impairment. This is encouraging, but remember that regular monitoring of cognitive health is important as we age."
            }
            Self::Moderate => {
                "Your screening results suggest moderate risk factors that warrant further professional evaluation. This doesn't mean you have dementia, but it indicates you should consult with a healthcare provider for a comprehensive assessment."
            }
            Self::High => {
                "Your screening results indicate several factors that suggest you should seek professional medical evaluation promptly. Early intervention can significantly improve outcomes and quality of life."
            }
        }
    }
}
