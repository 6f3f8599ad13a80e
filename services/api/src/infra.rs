use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use neuroscreen::config::ScreeningConfig;
use neuroscreen::workflows::screening::{
    CognitiveTaskRecord, IdentityProvider, RepositoryError, RiskAssessment, ScreeningId,
    ScreeningRepository, SessionDetails, StoredScreening, UserHandle, WizardPolicy,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the hosted results backend; ids follow the `scr-NNNNNN`
/// sequence a real adapter would receive from its database.
#[derive(Default)]
pub(crate) struct InMemoryScreeningRepository {
    sequence: AtomicU64,
    screenings: Mutex<HashMap<String, StoredScreening>>,
    task_records: Mutex<HashMap<String, Vec<CognitiveTaskRecord>>>,
}

impl ScreeningRepository for InMemoryScreeningRepository {
    fn save_screening_result(
        &self,
        user_id: &str,
        assessment: &RiskAssessment,
        details: &SessionDetails,
    ) -> Result<ScreeningId, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let screening_id = ScreeningId(format!("scr-{id:06}"));

        let stored = StoredScreening {
            screening_id: screening_id.clone(),
            user_id: user_id.to_string(),
            screened_at: Utc::now(),
            assessment: assessment.clone(),
            details: details.clone(),
        };

        self.screenings
            .lock()
            .expect("repository mutex poisoned")
            .insert(screening_id.0.clone(), stored);
        Ok(screening_id)
    }

    fn save_cognitive_task_records(
        &self,
        screening_id: &ScreeningId,
        records: &[CognitiveTaskRecord],
    ) -> Result<(), RepositoryError> {
        let guard = self.screenings.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&screening_id.0) {
            return Err(RepositoryError::NotFound);
        }
        drop(guard);

        self.task_records
            .lock()
            .expect("repository mutex poisoned")
            .insert(screening_id.0.clone(), records.to_vec());
        Ok(())
    }

    fn fetch(&self, screening_id: &ScreeningId) -> Result<Option<StoredScreening>, RepositoryError> {
        let guard = self.screenings.lock().expect("repository mutex poisoned");
        Ok(guard.get(&screening_id.0).cloned())
    }

    fn recent_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredScreening>, RepositoryError> {
        let guard = self.screenings.lock().expect("repository mutex poisoned");
        let mut rows: Vec<StoredScreening> = guard
            .values()
            .filter(|stored| stored.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.screened_at.cmp(&a.screened_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// Identity snapshot fixed at construction; the core reads it, never mutates it.
pub(crate) struct StaticIdentityProvider {
    user: Option<UserHandle>,
}

impl StaticIdentityProvider {
    pub(crate) fn new(user: Option<UserHandle>) -> Self {
        Self { user }
    }

    /// Resolve the identity from `SCREENING_USER_ID` / `SCREENING_USER_NAME`;
    /// absent means every session runs as a guest.
    pub(crate) fn from_env() -> Self {
        let user = env::var("SCREENING_USER_ID").ok().map(|user_id| UserHandle {
            user_id,
            display_name: env::var("SCREENING_USER_NAME").ok(),
        });
        Self::new(user)
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_user(&self) -> Option<UserHandle> {
        self.user.clone()
    }
}

pub(crate) fn wizard_policy(config: &ScreeningConfig) -> WizardPolicy {
    WizardPolicy {
        min_puzzle_moves: config.min_puzzle_moves,
        recording_duration: chrono::Duration::seconds(config.recording_seconds as i64),
        ..WizardPolicy::default()
    }
}
