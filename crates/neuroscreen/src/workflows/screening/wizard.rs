use chrono::{DateTime, Duration, Utc};

use super::assessment::{AssessmentInput, RiskAssessment, ScoringConfig, ScoringEngine};
use super::domain::{
    ParticipantProfile, PersonalInfoForm, PuzzleProgress, RecordingStatus, ScreeningStep,
    SessionDetails, ValidationError, WizardError, WizardEvent, RECALL_VOCABULARY,
};

/// Construction-time knobs for one screening attempt. Point amounts are
/// cosmetic gamification and never feed the risk calculation.
#[derive(Debug, Clone)]
pub struct WizardPolicy {
    pub min_puzzle_moves: u32,
    pub recording_duration: Duration,
    pub points_info_complete: u32,
    pub points_recording_complete: u32,
    pub points_per_recalled_word: u32,
    pub points_word_association: u32,
    pub scoring: ScoringConfig,
}

impl Default for WizardPolicy {
    fn default() -> Self {
        Self {
            min_puzzle_moves: 3,
            recording_duration: Duration::seconds(30),
            points_info_complete: 10,
            points_recording_complete: 15,
            points_per_recalled_word: 2,
            points_word_association: 5,
            scoring: ScoringConfig::default(),
        }
    }
}

/// One participant's pass through the screening wizard.
///
/// The step sequence is a linear chain Info -> Audio -> Cognitive -> Puzzle ->
/// Processing with Processing terminal. Forward transitions are guarded by
/// per-step validation; backward navigation never discards entered data. The
/// risk assessment is computed exactly once, at the Puzzle -> Processing
/// boundary. All time-dependent behavior takes an explicit `now` so the wizard
/// stays deterministic.
#[derive(Debug)]
pub struct ScreeningWizard {
    policy: WizardPolicy,
    engine: ScoringEngine,
    step: ScreeningStep,
    info: PersonalInfoForm,
    consent_given: bool,
    profile: Option<ParticipantProfile>,
    recording: RecordingStatus,
    recordings_completed: u32,
    recalled_words: Vec<&'static str>,
    word_association: String,
    puzzle: PuzzleProgress,
    points: u32,
    info_points_awarded: bool,
    cognitive_points_awarded: bool,
    assessment: Option<RiskAssessment>,
}

impl ScreeningWizard {
    pub fn new(policy: WizardPolicy) -> Self {
        let engine = ScoringEngine::new(policy.scoring.clone());
        Self {
            policy,
            engine,
            step: ScreeningStep::Info,
            info: PersonalInfoForm::default(),
            consent_given: false,
            profile: None,
            recording: RecordingStatus::Idle,
            recordings_completed: 0,
            recalled_words: Vec::new(),
            word_association: String::new(),
            puzzle: PuzzleProgress::default(),
            points: 0,
            info_points_awarded: false,
            cognitive_points_awarded: false,
            assessment: None,
        }
    }

    pub fn step(&self) -> ScreeningStep {
        self.step
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn personal_info(&self) -> &PersonalInfoForm {
        &self.info
    }

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    pub fn recording(&self) -> RecordingStatus {
        self.recording
    }

    pub fn recordings_completed(&self) -> u32 {
        self.recordings_completed
    }

    pub fn recalled_words(&self) -> &[&'static str] {
        &self.recalled_words
    }

    pub fn word_association(&self) -> &str {
        &self.word_association
    }

    pub fn puzzle(&self) -> PuzzleProgress {
        self.puzzle
    }

    pub fn puzzle_score(&self) -> Option<u8> {
        self.puzzle.score(self.policy.min_puzzle_moves)
    }

    pub fn assessment(&self) -> Option<&RiskAssessment> {
        self.assessment.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step == ScreeningStep::Processing
    }

    /// Apply a step-scoped interaction. Events belonging to a step other than
    /// the current one are rejected without touching session state.
    pub fn record_interaction(
        &mut self,
        event: WizardEvent,
        now: DateTime<Utc>,
    ) -> Result<(), WizardError> {
        if event.home_step() != self.step {
            return Err(WizardError::EventNotAvailable {
                event: event.name(),
                step: self.step,
            });
        }

        match event {
            WizardEvent::SetName(name) => self.info.name = name,
            WizardEvent::SetAge(age) => self.info.age = age,
            WizardEvent::SetGender(gender) => self.info.gender = Some(gender),
            WizardEvent::SetMedicalHistory(history) => self.info.medical_history = history,
            WizardEvent::SetConsent(consent) => self.consent_given = consent,
            WizardEvent::ToggleRecording => self.toggle_recording(now),
            WizardEvent::ToggleRecallWord(word) => self.toggle_recall_word(&word)?,
            WizardEvent::SetWordAssociation(response) => self.word_association = response,
            WizardEvent::PuzzleMove { matched } => self.puzzle.record_move(matched),
        }

        Ok(())
    }

    /// Drive the simulated recording timer. Once the configured duration has
    /// elapsed the recording auto-resets to idle and credits points.
    pub fn poll_recording(&mut self, now: DateTime<Utc>) -> RecordingStatus {
        if let RecordingStatus::Active { started_at } = self.recording {
            if now - started_at >= self.policy.recording_duration {
                self.recording = RecordingStatus::Idle;
                self.recordings_completed += 1;
                self.points += self.policy.points_recording_complete;
            }
        }
        self.recording
    }

    /// Guarded forward transition. On a validation failure the step and the
    /// entered data are left untouched.
    pub fn advance(&mut self) -> Result<ScreeningStep, WizardError> {
        match self.step {
            ScreeningStep::Info => {
                let profile = self.validate_info()?;
                self.profile = Some(profile);
                if !self.info_points_awarded {
                    self.info_points_awarded = true;
                    self.points += self.policy.points_info_complete;
                }
                self.step = ScreeningStep::Audio;
            }
            ScreeningStep::Audio => {
                // Leaving the step cancels an in-flight recording without credit.
                self.recording = RecordingStatus::Idle;
                self.step = ScreeningStep::Cognitive;
            }
            ScreeningStep::Cognitive => {
                if !self.cognitive_points_awarded {
                    self.cognitive_points_awarded = true;
                    self.points += self.cognitive_points();
                }
                self.step = ScreeningStep::Puzzle;
            }
            ScreeningStep::Puzzle => {
                let puzzle_score = self
                    .puzzle
                    .score(self.policy.min_puzzle_moves)
                    .ok_or(WizardError::PuzzleIncomplete)?;
                let profile = self.profile.as_ref().ok_or(WizardError::ProfileMissing)?;

                let assessment = self.engine.assess(AssessmentInput {
                    age: profile.age,
                    recalled_words: self.recalled_words.len(),
                    puzzle_score,
                });
                self.assessment = Some(assessment);
                self.step = ScreeningStep::Processing;
            }
            ScreeningStep::Processing => return Err(WizardError::ScreeningComplete),
        }

        Ok(self.step)
    }

    /// Move one step backward. Silent no-op at the first step and at the
    /// terminal Processing step; never discards entered data.
    pub fn retreat(&mut self) -> ScreeningStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Consume a finished wizard into the assessment and session snapshot
    /// handed to the persistence layer and the results presenter. Returns
    /// `None` unless the wizard reached Processing.
    pub fn into_results(self) -> Option<(RiskAssessment, SessionDetails)> {
        let assessment = self.assessment?;
        let profile = self.profile?;

        let word_association = {
            let trimmed = self.word_association.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        };

        let details = SessionDetails {
            name: profile.name,
            age: profile.age,
            gender: profile.gender,
            medical_history: profile.medical_history,
            recalled_words: self.recalled_words,
            word_association,
            puzzle_score: assessment.puzzle_score,
            points: self.points,
        };

        Some((assessment, details))
    }

    fn validate_info(&self) -> Result<ParticipantProfile, WizardError> {
        let profile = self.info.validate()?;
        if !self.consent_given {
            return Err(ValidationError::ConsentRequired.into());
        }
        Ok(profile)
    }

    fn toggle_recording(&mut self, now: DateTime<Utc>) {
        self.recording = match self.recording {
            RecordingStatus::Idle => RecordingStatus::Active { started_at: now },
            // Toggling mid-recording cancels it without credit.
            RecordingStatus::Active { .. } => RecordingStatus::Idle,
        };
    }

    fn toggle_recall_word(&mut self, word: &str) -> Result<(), WizardError> {
        let canonical = RECALL_VOCABULARY
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(word))
            .copied()
            .ok_or_else(|| WizardError::UnknownRecallWord(word.to_owned()))?;

        match self.recalled_words.iter().position(|w| *w == canonical) {
            Some(index) => {
                self.recalled_words.remove(index);
            }
            None => self.recalled_words.push(canonical),
        }

        Ok(())
    }

    fn cognitive_points(&self) -> u32 {
        let recall = self.recalled_words.len() as u32 * self.policy.points_per_recalled_word;
        let association = if self.word_association.trim().is_empty() {
            0
        } else {
            self.policy.points_word_association
        };
        recall + association
    }
}
