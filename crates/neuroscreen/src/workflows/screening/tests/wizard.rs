use chrono::Duration;

use super::common::{completed_wizard, policy, sample_instant};
use crate::workflows::screening::domain::{
    Gender, RecordingStatus, ScreeningStep, ValidationError, WizardError, WizardEvent,
};
use crate::workflows::screening::wizard::ScreeningWizard;

fn wizard_with_valid_info() -> ScreeningWizard {
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
    wizard
}

#[test]
fn advance_from_info_requires_every_field() {
    let now = sample_instant();

    let cases: Vec<(Box<dyn Fn(&mut ScreeningWizard)>, ValidationError)> = vec![
        (
            Box::new(|wizard: &mut ScreeningWizard| {
                wizard
                    .record_interaction(WizardEvent::SetName("   ".to_string()), now)
                    .expect("set name");
            }),
            ValidationError::MissingName,
        ),
        (
            Box::new(|wizard: &mut ScreeningWizard| {
                wizard
                    .record_interaction(WizardEvent::SetAge("not-a-number".to_string()), now)
                    .expect("set age");
            }),
            ValidationError::InvalidAge("not-a-number".to_string()),
        ),
        (
            Box::new(|wizard: &mut ScreeningWizard| {
                wizard
                    .record_interaction(WizardEvent::SetAge("0".to_string()), now)
                    .expect("set age");
            }),
            ValidationError::InvalidAge("0".to_string()),
        ),
    ];

    for (mutate, expected) in cases {
        let mut wizard = wizard_with_valid_info();
        mutate(&mut wizard);
        let info_before = wizard.personal_info().clone();

        match wizard.advance() {
            Err(WizardError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(wizard.step(), ScreeningStep::Info);
        assert_eq!(wizard.personal_info(), &info_before);
        assert_eq!(wizard.points(), 0);
    }
}

#[test]
fn advance_from_info_requires_gender_and_consent() {
    let now = sample_instant();

    let mut wizard = ScreeningWizard::new(policy());
    wizard
        .record_interaction(WizardEvent::SetName("Jane Doe".to_string()), now)
        .expect("set name");
    wizard
        .record_interaction(WizardEvent::SetAge("70".to_string()), now)
        .expect("set age");
    wizard
        .record_interaction(WizardEvent::SetConsent(true), now)
        .expect("set consent");
    assert!(matches!(
        wizard.advance(),
        Err(WizardError::Validation(ValidationError::MissingGender))
    ));
    assert_eq!(wizard.step(), ScreeningStep::Info);

    let mut wizard = wizard_with_valid_info();
    wizard
        .record_interaction(WizardEvent::SetConsent(false), now)
        .expect("withdraw consent");
    assert!(matches!(
        wizard.advance(),
        Err(WizardError::Validation(ValidationError::ConsentRequired))
    ));
    assert_eq!(wizard.step(), ScreeningStep::Info);
}

#[test]
fn info_completion_awards_points_once() {
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    assert_eq!(wizard.points(), 10);

    wizard.retreat();
    assert_eq!(wizard.step(), ScreeningStep::Info);
    wizard.advance().expect("info advances again");
    assert_eq!(wizard.points(), 10);
}

#[test]
fn events_are_rejected_outside_their_step() {
    let now = sample_instant();
    let mut wizard = ScreeningWizard::new(policy());

    let result =
        wizard.record_interaction(WizardEvent::ToggleRecallWord("Apple".to_string()), now);
    assert!(matches!(
        result,
        Err(WizardError::EventNotAvailable { step: ScreeningStep::Info, .. })
    ));
    assert!(wizard.recalled_words().is_empty());
}

#[test]
fn unknown_recall_words_are_rejected() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    wizard.advance().expect("audio advances");

    let result =
        wizard.record_interaction(WizardEvent::ToggleRecallWord("Banana".to_string()), now);
    assert!(matches!(result, Err(WizardError::UnknownRecallWord(word)) if word == "Banana"));
    assert!(wizard.recalled_words().is_empty());
}

#[test]
fn toggling_a_recalled_word_twice_removes_it() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    wizard.advance().expect("audio advances");

    wizard
        .record_interaction(WizardEvent::ToggleRecallWord("apple".to_string()), now)
        .expect("toggle on");
    assert_eq!(wizard.recalled_words(), ["Apple"]);

    wizard
        .record_interaction(WizardEvent::ToggleRecallWord("Apple".to_string()), now)
        .expect("toggle off");
    assert!(wizard.recalled_words().is_empty());
}

#[test]
fn recording_completes_after_the_configured_duration() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    let points_before = wizard.points();

    wizard
        .record_interaction(WizardEvent::ToggleRecording, now)
        .expect("start recording");
    assert!(wizard.recording().is_active());

    let status = wizard.poll_recording(now + Duration::seconds(10));
    assert!(status.is_active());
    assert_eq!(wizard.points(), points_before);

    let status = wizard.poll_recording(now + Duration::seconds(30));
    assert_eq!(status, RecordingStatus::Idle);
    assert_eq!(wizard.recordings_completed(), 1);
    assert_eq!(wizard.points(), points_before + 15);
}

#[test]
fn toggling_mid_recording_cancels_without_credit() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    let points_before = wizard.points();

    wizard
        .record_interaction(WizardEvent::ToggleRecording, now)
        .expect("start recording");
    wizard
        .record_interaction(WizardEvent::ToggleRecording, now + Duration::seconds(5))
        .expect("stop recording");

    assert_eq!(wizard.recording(), RecordingStatus::Idle);
    assert_eq!(wizard.recordings_completed(), 0);
    assert_eq!(wizard.points(), points_before);
}

#[test]
fn leaving_audio_cancels_an_in_flight_recording() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    let points_before = wizard.points();

    wizard
        .record_interaction(WizardEvent::ToggleRecording, now)
        .expect("start recording");
    wizard.advance().expect("audio advances");

    assert_eq!(wizard.recording(), RecordingStatus::Idle);
    let status = wizard.poll_recording(now + Duration::seconds(60));
    assert_eq!(status, RecordingStatus::Idle);
    assert_eq!(wizard.recordings_completed(), 0);
    assert_eq!(wizard.points(), points_before);
}

#[test]
fn retreat_never_discards_entered_data() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    wizard.advance().expect("audio advances");
    wizard
        .record_interaction(WizardEvent::ToggleRecallWord("Ocean".to_string()), now)
        .expect("toggle word");

    wizard.retreat();
    assert_eq!(wizard.step(), ScreeningStep::Audio);
    wizard.retreat();
    assert_eq!(wizard.step(), ScreeningStep::Info);
    // Already at the first step: silent no-op.
    wizard.retreat();
    assert_eq!(wizard.step(), ScreeningStep::Info);

    assert_eq!(wizard.recalled_words(), ["Ocean"]);
    assert_eq!(wizard.personal_info().name, "Jane Doe");
    assert!(wizard.consent_given());
}

#[test]
fn puzzle_must_reach_the_minimum_move_count() {
    let now = sample_instant();
    let mut wizard = wizard_with_valid_info();
    wizard.advance().expect("info advances");
    wizard.advance().expect("audio advances");
    wizard.advance().expect("cognitive advances");

    for matched in [true, false] {
        wizard
            .record_interaction(WizardEvent::PuzzleMove { matched }, now)
            .expect("puzzle move");
    }
    assert!(matches!(wizard.advance(), Err(WizardError::PuzzleIncomplete)));
    assert_eq!(wizard.step(), ScreeningStep::Puzzle);
    assert_eq!(wizard.puzzle_score(), None);

    wizard
        .record_interaction(WizardEvent::PuzzleMove { matched: true }, now)
        .expect("puzzle move");
    assert_eq!(wizard.puzzle_score(), Some(67));
    wizard.advance().expect("puzzle advances");
    assert_eq!(wizard.step(), ScreeningStep::Processing);
}

#[test]
fn processing_is_terminal() {
    let mut wizard = completed_wizard();
    assert!(wizard.is_complete());

    assert!(matches!(wizard.advance(), Err(WizardError::ScreeningComplete)));
    assert_eq!(wizard.retreat(), ScreeningStep::Processing);
    assert_eq!(wizard.step(), ScreeningStep::Processing);
}

#[test]
fn completion_computes_the_assessment_once() {
    let wizard = completed_wizard();

    let assessment = wizard.assessment().expect("assessment present");
    assert_eq!(assessment.memory_score, 50);
    assert_eq!(assessment.puzzle_score, 80);
    assert_eq!(assessment.risk_score, 45);
    assert_eq!(assessment.age_factor, 70);

    // Info (10) + recall (3 * 2) + association (5).
    assert_eq!(wizard.points(), 21);
}

#[test]
fn into_results_requires_a_finished_session() {
    let wizard = wizard_with_valid_info();
    assert!(wizard.into_results().is_none());

    let wizard = completed_wizard();
    let (assessment, details) = wizard.into_results().expect("finished session");
    assert_eq!(details.name, "Jane Doe");
    assert_eq!(details.age, 70);
    assert_eq!(details.recalled_words, ["Apple", "Chair", "Ocean"]);
    assert_eq!(details.word_association.as_deref(), Some("Warmth"));
    assert_eq!(details.puzzle_score, assessment.puzzle_score);
    assert_eq!(details.points, 21);
}
