use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Gender, WizardError, WizardEvent};
use super::repository::{IdentityProvider, ScreeningId, ScreeningRepository, StoredScreening};
use super::service::ScreeningService;
use super::wizard::{ScreeningWizard, WizardPolicy};

const HISTORY_LIMIT: usize = 20;

/// Shared router state: the service plus the wizard policy used to replay
/// submissions through the step machine.
pub struct ScreeningState<R, I> {
    pub service: ScreeningService<R, I>,
    pub policy: WizardPolicy,
}

/// Router builder exposing HTTP endpoints for submitting and reading screenings.
pub fn screening_router<R, I>(state: Arc<ScreeningState<R, I>>) -> Router
where
    R: ScreeningRepository + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/screenings",
            get(history_handler::<R, I>).post(submit_handler::<R, I>),
        )
        .route(
            "/api/v1/screenings/:screening_id",
            get(fetch_handler::<R, I>),
        )
        .with_state(state)
}

/// One complete wizard pass as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningSubmission {
    pub name: String,
    /// Raw form input; must parse to a whole number greater than zero.
    pub age: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub consent: bool,
    /// Whether the participant completed the simulated voice recording.
    #[serde(default)]
    pub recorded_sample: bool,
    #[serde(default)]
    pub recalled_words: Vec<String>,
    #[serde(default)]
    pub word_association: Option<String>,
    /// Match outcome of each puzzle move, in order.
    #[serde(default)]
    pub puzzle_moves: Vec<bool>,
}

pub(crate) async fn submit_handler<R, I>(
    State(state): State<Arc<ScreeningState<R, I>>>,
    Json(submission): Json<ScreeningSubmission>,
) -> Response
where
    R: ScreeningRepository + 'static,
    I: IdentityProvider + 'static,
{
    let wizard = match drive_wizard(state.policy.clone(), submission, Utc::now()) {
        Ok(wizard) => wizard,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match state.service.complete(wizard).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fetch_handler<R, I>(
    State(state): State<Arc<ScreeningState<R, I>>>,
    Path(screening_id): Path<String>,
) -> Response
where
    R: ScreeningRepository + 'static,
    I: IdentityProvider + 'static,
{
    let id = ScreeningId(screening_id);
    match state.service.fetch(&id) {
        Ok(Some(stored)) => (StatusCode::OK, Json(stored.detail_view())).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "screening not found", "screening_id": id.0 });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<R, I>(
    State(state): State<Arc<ScreeningState<R, I>>>,
) -> Response
where
    R: ScreeningRepository + 'static,
    I: IdentityProvider + 'static,
{
    match state.service.history(HISTORY_LIMIT) {
        Ok(screenings) => {
            let views: Vec<_> = screenings
                .iter()
                .map(StoredScreening::summary_view)
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Replay a submission through the wizard step machine so every transition is
/// validated exactly as an interactive session would be.
pub fn drive_wizard(
    policy: WizardPolicy,
    submission: ScreeningSubmission,
    now: DateTime<Utc>,
) -> Result<ScreeningWizard, WizardError> {
    let recording_duration = policy.recording_duration;
    let mut wizard = ScreeningWizard::new(policy);

    wizard.record_interaction(WizardEvent::SetName(submission.name), now)?;
    wizard.record_interaction(WizardEvent::SetAge(submission.age), now)?;
    if let Some(gender) = submission.gender {
        wizard.record_interaction(WizardEvent::SetGender(gender), now)?;
    }
    if let Some(history) = submission.medical_history {
        wizard.record_interaction(WizardEvent::SetMedicalHistory(history), now)?;
    }
    wizard.record_interaction(WizardEvent::SetConsent(submission.consent), now)?;
    wizard.advance()?;

    if submission.recorded_sample {
        wizard.record_interaction(WizardEvent::ToggleRecording, now)?;
        wizard.poll_recording(now + recording_duration);
    }
    wizard.advance()?;

    for word in submission.recalled_words {
        wizard.record_interaction(WizardEvent::ToggleRecallWord(word), now)?;
    }
    if let Some(response) = submission.word_association {
        wizard.record_interaction(WizardEvent::SetWordAssociation(response), now)?;
    }
    wizard.advance()?;

    for matched in submission.puzzle_moves {
        wizard.record_interaction(WizardEvent::PuzzleMove { matched }, now)?;
    }
    wizard.advance()?;

    Ok(wizard)
}
