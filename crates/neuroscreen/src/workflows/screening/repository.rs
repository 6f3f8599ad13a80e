use chrono::{DateTime, Utc};
use serde::Serialize;

use super::assessment::RiskAssessment;
use super::domain::{CognitiveTaskRecord, SessionDetails};

/// Identifier wrapper for stored screenings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScreeningId(pub String);

/// Snapshot of the authenticated identity, read from the provider and never
/// mutated by the screening core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHandle {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// Narrow query capability over the external authentication service. Injected
/// at service construction so the core never subscribes to ambient auth state.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserHandle>;
}

/// Storage abstraction over the external results backend. Write operations are
/// called at most once per completed session; the core never retries them.
pub trait ScreeningRepository: Send + Sync {
    fn save_screening_result(
        &self,
        user_id: &str,
        assessment: &RiskAssessment,
        details: &SessionDetails,
    ) -> Result<ScreeningId, RepositoryError>;

    fn save_cognitive_task_records(
        &self,
        screening_id: &ScreeningId,
        records: &[CognitiveTaskRecord],
    ) -> Result<(), RepositoryError>;

    fn fetch(&self, screening_id: &ScreeningId) -> Result<Option<StoredScreening>, RepositoryError>;

    fn recent_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredScreening>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Repository row for one persisted screening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredScreening {
    pub screening_id: ScreeningId,
    pub user_id: String,
    pub screened_at: DateTime<Utc>,
    pub assessment: RiskAssessment,
    pub details: SessionDetails,
}

impl StoredScreening {
    /// Compact history entry for dashboard listings.
    pub fn summary_view(&self) -> ScreeningSummaryView {
        ScreeningSummaryView {
            screening_id: self.screening_id.clone(),
            screened_at: self.screened_at,
            risk_score: self.assessment.risk_score,
            risk_level: self.assessment.risk_level.label(),
        }
    }

    /// Sanitized single-screening view; omits medical history.
    pub fn detail_view(&self) -> ScreeningDetailView {
        ScreeningDetailView {
            screening_id: self.screening_id.clone(),
            screened_at: self.screened_at,
            name: self.details.name.clone(),
            risk_score: self.assessment.risk_score,
            risk_level: self.assessment.risk_level.label(),
            guidance: self.assessment.risk_level.guidance(),
            memory_score: self.assessment.memory_score,
            puzzle_score: self.assessment.puzzle_score,
            recommendations: self.assessment.recommendations.clone(),
            points: self.details.points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningSummaryView {
    pub screening_id: ScreeningId,
    pub screened_at: DateTime<Utc>,
    pub risk_score: u8,
    pub risk_level: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningDetailView {
    pub screening_id: ScreeningId,
    pub screened_at: DateTime<Utc>,
    pub name: String,
    pub risk_score: u8,
    pub risk_level: &'static str,
    pub guidance: &'static str,
    pub memory_score: u8,
    pub puzzle_score: u8,
    pub recommendations: Vec<&'static str>,
    pub points: u32,
}
