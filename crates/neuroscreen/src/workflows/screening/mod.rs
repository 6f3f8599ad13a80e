//! The cognitive screening workflow: a guarded multi-step wizard, a pure
//! scoring engine, and the persistence boundary for completed sessions.
//!
//! The wizard owns one participant's session state and enforces the step
//! order; scoring runs exactly once at the puzzle/processing boundary; the
//! service decides between persisted and ephemeral result handoff based on the
//! injected identity snapshot.

pub mod assessment;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use assessment::{AssessmentInput, RiskAssessment, RiskLevel, ScoringConfig, ScoringEngine};
pub use domain::{
    CognitiveTask, CognitiveTaskRecord, Gender, ParticipantProfile, PersonalInfoForm,
    PuzzleProgress, RecordingStatus, ScreeningStep, SessionDetails, ValidationError, WizardError,
    WizardEvent, ASSOCIATION_PROMPT, RECALL_VOCABULARY,
};
pub use repository::{
    IdentityProvider, RepositoryError, ScreeningDetailView, ScreeningId, ScreeningRepository,
    ScreeningSummaryView, StoredScreening, UserHandle,
};
pub use router::{drive_wizard, screening_router, ScreeningState, ScreeningSubmission};
pub use service::{EphemeralReason, ScreeningOutcome, ScreeningService, ScreeningServiceError};
pub use wizard::{ScreeningWizard, WizardPolicy};
