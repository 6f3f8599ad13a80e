use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::screening::domain::{CognitiveTaskRecord, Gender, SessionDetails, WizardEvent};
use crate::workflows::screening::repository::{
    IdentityProvider, RepositoryError, ScreeningId, ScreeningRepository, StoredScreening,
    UserHandle,
};
use crate::workflows::screening::wizard::{ScreeningWizard, WizardPolicy};
use crate::workflows::screening::RiskAssessment;

pub(super) fn sample_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn policy() -> WizardPolicy {
    WizardPolicy::default()
}

/// Drive a wizard through every step with the Jane Doe scenario: age 70,
/// 3 of 6 words recalled, puzzle 4/5 -> risk 45, moderate.
pub(super) fn completed_wizard() -> ScreeningWizard {
    let now = sample_instant();
    let mut wizard = ScreeningWizard::new(policy());

    wizard
        .record_interaction(WizardEvent::SetName("Jane Doe".to_string()), now)
        .expect("set name");
    wizard
        .record_interaction(WizardEvent::SetAge("70".to_string()), now)
        .expect("set age");
    wizard
        .record_interaction(WizardEvent::SetGender(Gender::Female), now)
        .expect("set gender");
    wizard
        .record_interaction(WizardEvent::SetConsent(true), now)
        .expect("set consent");
    wizard.advance().expect("info advances");

    wizard.advance().expect("audio advances");

    for word in ["Apple", "Chair", "Ocean"] {
        wizard
            .record_interaction(WizardEvent::ToggleRecallWord(word.to_string()), now)
            .expect("toggle recall word");
    }
    wizard
        .record_interaction(WizardEvent::SetWordAssociation("Warmth".to_string()), now)
        .expect("set association");
    wizard.advance().expect("cognitive advances");

    for matched in [true, true, true, true, false] {
        wizard
            .record_interaction(WizardEvent::PuzzleMove { matched }, now)
            .expect("puzzle move");
    }
    wizard.advance().expect("puzzle advances");

    wizard
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    sequence: AtomicU64,
    screenings: Mutex<HashMap<String, StoredScreening>>,
    task_records: Mutex<HashMap<String, Vec<CognitiveTaskRecord>>>,
    pub(super) fail_save_result: AtomicBool,
    pub(super) fail_save_tasks: AtomicBool,
    pub(super) save_result_calls: AtomicUsize,
    pub(super) save_tasks_calls: AtomicUsize,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &ScreeningId) -> Option<StoredScreening> {
        self.screenings
            .lock()
            .expect("repository mutex poisoned")
            .get(&id.0)
            .cloned()
    }

    pub(super) fn task_records_for(&self, id: &ScreeningId) -> Vec<CognitiveTaskRecord> {
        self.task_records
            .lock()
            .expect("repository mutex poisoned")
            .get(&id.0)
            .cloned()
            .unwrap_or_default()
    }
}

impl ScreeningRepository for MemoryRepository {
    fn save_screening_result(
        &self,
        user_id: &str,
        assessment: &RiskAssessment,
        details: &SessionDetails,
    ) -> Result<ScreeningId, RepositoryError> {
        self.save_result_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_save_result.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("backend offline".to_string()));
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let screening_id = ScreeningId(format!("scr-{id:06}"));
        let stored = StoredScreening {
            screening_id: screening_id.clone(),
            user_id: user_id.to_string(),
            screened_at: sample_instant(),
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
        self.save_tasks_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_save_tasks.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("backend offline".to_string()));
        }

        self.task_records
            .lock()
            .expect("repository mutex poisoned")
            .insert(screening_id.0.clone(), records.to_vec());
        Ok(())
    }

    fn fetch(&self, screening_id: &ScreeningId) -> Result<Option<StoredScreening>, RepositoryError> {
        Ok(self.stored(screening_id))
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

pub(super) struct StaticIdentity(pub(super) Option<UserHandle>);

impl StaticIdentity {
    pub(super) fn authenticated(user_id: &str) -> Self {
        Self(Some(UserHandle {
            user_id: user_id.to_string(),
            display_name: Some("Test User".to_string()),
        }))
    }

    pub(super) fn guest() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserHandle> {
        self.0.clone()
    }
}
