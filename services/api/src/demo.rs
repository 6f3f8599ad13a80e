use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Args;

use crate::infra::{wizard_policy, InMemoryScreeningRepository, StaticIdentityProvider};
use neuroscreen::config::ScreeningConfig;
use neuroscreen::error::AppError;
use neuroscreen::workflows::screening::{
    drive_wizard, EphemeralReason, Gender, ScreeningOutcome, ScreeningRepository, ScreeningService,
    ScreeningSubmission, UserHandle, RECALL_VOCABULARY,
};

// Keep the scripted demo snappy; the configured 3s delay is for the real flow.
const DEMO_PROCESSING_DELAY: Duration = Duration::from_millis(500);

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Participant name for the scripted session
    #[arg(long, default_value = "Jane Doe")]
    pub(crate) name: String,
    /// Participant age
    #[arg(long, default_value = "70")]
    pub(crate) age: String,
    /// Participant gender (male, female, other)
    #[arg(long, default_value = "female", value_parser = parse_gender)]
    pub(crate) gender: Gender,
    /// Comma-separated words recalled during the memory task
    #[arg(long, value_delimiter = ',', default_value = "Apple,Chair,Ocean")]
    pub(crate) recall: Vec<String>,
    /// Free-text word association response
    #[arg(long, default_value = "Warmth")]
    pub(crate) association: String,
    /// Puzzle moves that matched
    #[arg(long, default_value_t = 4)]
    pub(crate) puzzle_matched: u32,
    /// Total puzzle moves
    #[arg(long, default_value_t = 5)]
    pub(crate) puzzle_moves: u32,
    /// Skip the simulated voice recording
    #[arg(long)]
    pub(crate) skip_recording: bool,
    /// Run as an authenticated user so the result is persisted
    #[arg(long)]
    pub(crate) user_id: Option<String>,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        other => Err(format!("'{other}' is not one of male, female, other")),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        name,
        age,
        gender,
        recall,
        association,
        puzzle_matched,
        puzzle_moves,
        skip_recording,
        user_id,
    } = args;

    println!("Screening wizard demo");
    println!(
        "Participant: {} (age {}, {})",
        name,
        age,
        gender.label()
    );
    println!(
        "Recall vocabulary: {} | claimed: {}",
        RECALL_VOCABULARY.join(", "),
        if recall.is_empty() {
            "none".to_string()
        } else {
            recall.join(", ")
        }
    );

    let submission = ScreeningSubmission {
        name,
        age,
        gender: Some(gender),
        medical_history: None,
        consent: true,
        recorded_sample: !skip_recording,
        recalled_words: recall,
        word_association: Some(association),
        puzzle_moves: (0..puzzle_moves).map(|i| i < puzzle_matched).collect(),
    };

    let config = ScreeningConfig::default();
    let wizard = match drive_wizard(wizard_policy(&config), submission, Utc::now()) {
        Ok(wizard) => wizard,
        Err(err) => {
            println!("\nSubmission rejected: {err}");
            return Ok(());
        }
    };

    println!(
        "\nWizard complete: {} points earned, puzzle score {}",
        wizard.points(),
        wizard
            .puzzle_score()
            .map(|score| score.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );

    let identity = StaticIdentityProvider::new(user_id.map(|user_id| UserHandle {
        user_id,
        display_name: None,
    }));
    let repository = Arc::new(InMemoryScreeningRepository::default());
    let service = ScreeningService::new(repository.clone(), Arc::new(identity), DEMO_PROCESSING_DELAY);

    println!("Processing responses...");
    let outcome = service.complete(wizard).await?;
    render_outcome(&outcome);

    if let ScreeningOutcome::Persisted { screening_id, .. } = &outcome {
        match repository.fetch(screening_id) {
            Ok(Some(stored)) => match serde_json::to_string_pretty(&stored.detail_view()) {
                Ok(json) => println!("\nStored screening payload:\n{json}"),
                Err(err) => println!("\nStored screening payload unavailable: {err}"),
            },
            Ok(None) => println!("\nRepository lookup returned no record"),
            Err(err) => println!("\nRepository unavailable: {err}"),
        }
    }

    Ok(())
}

fn render_outcome(outcome: &ScreeningOutcome) {
    let assessment = outcome.assessment();

    println!(
        "\nRisk assessment: {}% ({})",
        assessment.risk_score,
        assessment.risk_level.label()
    );
    println!(
        "Sub-factors: memory {} | puzzle {} | age {}",
        assessment.memory_score, assessment.puzzle_score, assessment.age_factor
    );
    println!("{}", assessment.risk_level.guidance());

    println!("\nRecommended next steps");
    for recommendation in &assessment.recommendations {
        println!("- {recommendation}");
    }

    match outcome {
        ScreeningOutcome::Persisted { screening_id, .. } => {
            println!("\nResult saved as {}", screening_id.0);
        }
        ScreeningOutcome::Ephemeral { reason, .. } => match reason {
            EphemeralReason::Guest => {
                println!("\nGuest session: result shown from memory only, nothing stored");
            }
            EphemeralReason::PersistenceFailed(message) => {
                println!("\nFailed to save results ({message}); showing the assessment from memory");
            }
        },
    }
}
