use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::RiskAssessment;

/// Words shown (notionally) to the participant before the recall task.
pub const RECALL_VOCABULARY: [&str; 6] = ["Apple", "Chair", "Ocean", "Garden", "Book", "Mountain"];

/// Prompt word for the free-text association task.
pub const ASSOCIATION_PROMPT: &str = "Sun";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStep {
    Info,
    Audio,
    Cognitive,
    Puzzle,
    Processing,
}

impl ScreeningStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Info,
            Self::Audio,
            Self::Cognitive,
            Self::Puzzle,
            Self::Processing,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Personal Information",
            Self::Audio => "Voice Recording",
            Self::Cognitive => "Cognitive Tasks",
            Self::Puzzle => "Puzzle Challenge",
            Self::Processing => "Processing",
        }
    }

    pub(crate) const fn previous(self) -> Option<Self> {
        match self {
            Self::Info => None,
            Self::Audio => Some(Self::Info),
            Self::Cognitive => Some(Self::Audio),
            Self::Puzzle => Some(Self::Cognitive),
            // Terminal: the assessment is already computed, there is nothing to go back to.
            Self::Processing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

/// Raw intake form as the participant typed it; validated on leaving the Info step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfoForm {
    pub name: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub medical_history: String,
}

impl PersonalInfoForm {
    /// Validate the form into a participant profile without mutating the draft.
    pub fn validate(&self) -> Result<ParticipantProfile, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|age| *age > 0)
            .ok_or_else(|| ValidationError::InvalidAge(self.age.clone()))?;

        let gender = self.gender.ok_or(ValidationError::MissingGender)?;

        let medical_history = {
            let trimmed = self.medical_history.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        };

        Ok(ParticipantProfile {
            name: name.to_owned(),
            age,
            gender,
            medical_history,
        })
    }
}

/// Validated participant data carried forward once the Info step is passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub medical_history: Option<String>,
}

/// Simulated audio-recording sub-state. The clock is injected by callers so the
/// timer is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    Idle,
    Active { started_at: DateTime<Utc> },
}

impl RecordingStatus {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Tally of puzzle moves. The puzzle counts as complete once the minimum move
/// count is reached; the score covers every move made before advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PuzzleProgress {
    matched: u32,
    total: u32,
}

impl PuzzleProgress {
    pub const fn matched(&self) -> u32 {
        self.matched
    }

    pub const fn total(&self) -> u32 {
        self.total
    }

    pub const fn is_complete(&self, min_moves: u32) -> bool {
        self.total >= min_moves
    }

    /// Match percentage over all moves; `None` until the puzzle is complete.
    pub fn score(&self, min_moves: u32) -> Option<u8> {
        if !self.is_complete(min_moves) || self.total == 0 {
            return None;
        }
        Some((self.matched as f64 * 100.0 / self.total as f64).round() as u8)
    }

    pub(crate) fn record_move(&mut self, matched: bool) {
        self.total += 1;
        if matched {
            self.matched += 1;
        }
    }
}

/// Step-scoped interactions accepted by the wizard.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    SetName(String),
    SetAge(String),
    SetGender(Gender),
    SetMedicalHistory(String),
    SetConsent(bool),
    ToggleRecording,
    ToggleRecallWord(String),
    SetWordAssociation(String),
    PuzzleMove { matched: bool },
}

impl WizardEvent {
    /// The step during which the event is meaningful.
    pub(crate) const fn home_step(&self) -> ScreeningStep {
        match self {
            Self::SetName(_)
            | Self::SetAge(_)
            | Self::SetGender(_)
            | Self::SetMedicalHistory(_)
            | Self::SetConsent(_) => ScreeningStep::Info,
            Self::ToggleRecording => ScreeningStep::Audio,
            Self::ToggleRecallWord(_) | Self::SetWordAssociation(_) => ScreeningStep::Cognitive,
            Self::PuzzleMove { .. } => ScreeningStep::Puzzle,
        }
    }

    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::SetName(_) => "set_name",
            Self::SetAge(_) => "set_age",
            Self::SetGender(_) => "set_gender",
            Self::SetMedicalHistory(_) => "set_medical_history",
            Self::SetConsent(_) => "set_consent",
            Self::ToggleRecording => "toggle_recording",
            Self::ToggleRecallWord(_) => "toggle_recall_word",
            Self::SetWordAssociation(_) => "set_word_association",
            Self::PuzzleMove { .. } => "puzzle_move",
        }
    }
}

/// Immutable snapshot of a finished session, persisted alongside the assessment
/// and included verbatim in the ephemeral handoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetails {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub medical_history: Option<String>,
    pub recalled_words: Vec<&'static str>,
    pub word_association: Option<String>,
    pub puzzle_score: u8,
    pub points: u32,
}

impl SessionDetails {
    /// Per-task breakdown stored next to the screening result.
    pub fn cognitive_task_records(&self, assessment: &RiskAssessment) -> Vec<CognitiveTaskRecord> {
        let recall_detail = if self.recalled_words.is_empty() {
            format!("recalled 0 of {} words", RECALL_VOCABULARY.len())
        } else {
            format!(
                "recalled {} of {} words: {}",
                self.recalled_words.len(),
                RECALL_VOCABULARY.len(),
                self.recalled_words.join(", ")
            )
        };

        let association_detail = match &self.word_association {
            Some(response) => format!("prompt '{ASSOCIATION_PROMPT}' -> '{response}'"),
            None => format!("prompt '{ASSOCIATION_PROMPT}' -> no response"),
        };

        vec![
            CognitiveTaskRecord {
                task: CognitiveTask::MemoryRecall,
                score: Some(assessment.memory_score),
                detail: recall_detail,
            },
            CognitiveTaskRecord {
                task: CognitiveTask::WordAssociation,
                score: None,
                detail: association_detail,
            },
            CognitiveTaskRecord {
                task: CognitiveTask::Puzzle,
                score: Some(self.puzzle_score),
                detail: format!("puzzle score {}/100", self.puzzle_score),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveTask {
    MemoryRecall,
    WordAssociation,
    Puzzle,
}

impl CognitiveTask {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MemoryRecall => "Memory Recall",
            Self::WordAssociation => "Word Association",
            Self::Puzzle => "Puzzle",
        }
    }
}

/// Record of one cognitive task within a stored screening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CognitiveTaskRecord {
    pub task: CognitiveTask,
    pub score: Option<u8>,
    pub detail: String,
}

/// Intake validation failures; handled at the step boundary, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("full name is required")]
    MissingName,
    #[error("age must be a whole number greater than zero (got '{0}')")]
    InvalidAge(String),
    #[error("gender selection is required")]
    MissingGender,
    #[error("consent is required before continuing")]
    ConsentRequired,
}

/// Errors raised by the wizard controller.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{event} is not available during the {step} step", step = .step.label())]
    EventNotAvailable {
        event: &'static str,
        step: ScreeningStep,
    },
    #[error("'{0}' is not part of the recall vocabulary")]
    UnknownRecallWord(String),
    #[error("the puzzle must be completed before continuing")]
    PuzzleIncomplete,
    #[error("the screening is already complete")]
    ScreeningComplete,
    #[error("session advanced past intake without a validated profile")]
    ProfileMissing,
}
