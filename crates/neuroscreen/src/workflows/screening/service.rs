use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use super::assessment::RiskAssessment;
use super::domain::SessionDetails;
use super::repository::{
    IdentityProvider, RepositoryError, ScreeningId, ScreeningRepository, StoredScreening,
};
use super::wizard::ScreeningWizard;

/// Service sequencing the simulated processing delay, the identity read, and
/// the persistence branch for completed screenings.
pub struct ScreeningService<R, I> {
    repository: Arc<R>,
    identity: Arc<I>,
    processing_delay: Duration,
}

impl<R, I> ScreeningService<R, I>
where
    R: ScreeningRepository + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(repository: Arc<R>, identity: Arc<I>, processing_delay: Duration) -> Self {
        Self {
            repository,
            identity,
            processing_delay,
        }
    }

    /// Finish a screening: wait out the simulated processing delay, then either
    /// persist the result under the current identity or hand it back for
    /// ephemeral presentation.
    ///
    /// Persistence failures are absorbed: the flow still completes with the
    /// in-memory assessment and no retry is attempted.
    pub async fn complete(
        &self,
        wizard: ScreeningWizard,
    ) -> Result<ScreeningOutcome, ScreeningServiceError> {
        let (assessment, details) = wizard
            .into_results()
            .ok_or(ScreeningServiceError::SessionIncomplete)?;

        tokio::time::sleep(self.processing_delay).await;

        let Some(user) = self.identity.current_user() else {
            return Ok(ScreeningOutcome::Ephemeral {
                reason: EphemeralReason::Guest,
                assessment,
                details,
            });
        };

        let screening_id =
            match self
                .repository
                .save_screening_result(&user.user_id, &assessment, &details)
            {
                Ok(id) => id,
                Err(err) => {
                    warn!(user_id = %user.user_id, error = %err, "failed to save screening result; presenting ephemeral assessment");
                    return Ok(ScreeningOutcome::Ephemeral {
                        reason: EphemeralReason::PersistenceFailed(err.to_string()),
                        assessment,
                        details,
                    });
                }
            };

        let records = details.cognitive_task_records(&assessment);
        if let Err(err) = self
            .repository
            .save_cognitive_task_records(&screening_id, &records)
        {
            warn!(screening_id = %screening_id.0, error = %err, "failed to save cognitive task records; presenting ephemeral assessment");
            return Ok(ScreeningOutcome::Ephemeral {
                reason: EphemeralReason::PersistenceFailed(err.to_string()),
                assessment,
                details,
            });
        }

        Ok(ScreeningOutcome::Persisted {
            screening_id,
            assessment,
        })
    }

    /// Stored screening by id, for result lookups.
    pub fn fetch(
        &self,
        screening_id: &ScreeningId,
    ) -> Result<Option<StoredScreening>, RepositoryError> {
        self.repository.fetch(screening_id)
    }

    /// Recent screenings for the current identity; guests have no history.
    pub fn history(&self, limit: usize) -> Result<Vec<StoredScreening>, RepositoryError> {
        match self.identity.current_user() {
            Some(user) => self.repository.recent_for_user(&user.user_id, limit),
            None => Ok(Vec::new()),
        }
    }
}

/// Handoff to the results presenter: either a persisted record id or the full
/// in-memory assessment with its session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "presentation", rename_all = "snake_case")]
pub enum ScreeningOutcome {
    Persisted {
        screening_id: ScreeningId,
        assessment: RiskAssessment,
    },
    Ephemeral {
        reason: EphemeralReason,
        assessment: RiskAssessment,
        details: SessionDetails,
    },
}

impl ScreeningOutcome {
    pub fn assessment(&self) -> &RiskAssessment {
        match self {
            Self::Persisted { assessment, .. } | Self::Ephemeral { assessment, .. } => assessment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EphemeralReason {
    Guest,
    PersistenceFailed(String),
}

/// Invariant fault: `complete` was handed a wizard that never reached the
/// processing step. Indicates a controller bug, not a user error.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("screening session has not reached the processing step")]
    SessionIncomplete,
}
