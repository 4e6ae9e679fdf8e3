//! The final accusation.
//!
//! Gated locally before any classifier call. The verdict itself comes from
//! a structured classifier; a reply that does not decode is an incorrect
//! verdict with a generic message.

use hauntcam_core::command::Command;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{ContentPart, GenerateRequest, OutputConfig};
use hauntcam_core::model::{GamePatch, GameStatus};
use hauntcam_game::domain::state_machine;
use hauntcam_vision::prompts;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::application::PlayServices;
use crate::domain::commands::SubmitAccusation;
use crate::domain::messages::{
    ACCUSATION_CORRECT_MESSAGE, ACCUSATION_RETRY_MESSAGE, guarded_explanation,
};
use crate::domain::outcome::AccusationVerdict;

#[derive(Debug, Deserialize)]
struct JudgeReply {
    correct: bool,
    #[serde(default)]
    explanation: String,
}

fn judge_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "correct": { "type": "BOOLEAN" },
            "explanation": { "type": "STRING" }
        },
        "required": ["correct", "explanation"]
    })
}

/// Handles the `SubmitAccusation` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game or missing suspect
/// data, `DomainError::InvalidState` for a solved game or one with items
/// left, `DomainError::Validation` for a blank suspect, and the client's
/// error when the classifier call fails.
#[instrument(skip_all, fields(game_id = %command.game_id))]
pub async fn handle_accusation(
    command: &SubmitAccusation,
    services: &PlayServices<'_>,
) -> Result<AccusationVerdict, DomainError> {
    let game = services.games.get(command.game_id).await?;
    let catalog = services.scenario.catalog(game.mode);
    state_machine::ensure_accusation_allowed(&game, &catalog)?;

    let suspect = command.suspect.trim();
    if suspect.is_empty() {
        return Err(DomainError::Validation("suspect must not be blank".to_owned()));
    }
    let solution = services.scenario.suspect(game.current_chapter)?;

    let response = services
        .generative
        .generate(GenerateRequest {
            model: services.models.judge.clone(),
            parts: vec![ContentPart::Text(prompts::accusation_prompt(
                &solution.solution_text(),
                suspect,
                command.reasoning.trim(),
            ))],
            output: OutputConfig::Structured {
                schema: judge_schema(),
            },
        })
        .await?;

    let reply = match serde_json::from_str::<JudgeReply>(response.text().trim()) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(
                correlation_id = %command.correlation_id(),
                error = %e,
                "failed to decode accusation verdict; treating as incorrect"
            );
            return Ok(AccusationVerdict {
                correct: false,
                message: ACCUSATION_RETRY_MESSAGE.to_owned(),
                status: game.status,
            });
        }
    };

    let verdict = if reply.correct {
        let patch = GamePatch {
            status: Some(GameStatus::Solved),
            ..GamePatch::default()
        };
        let game = services
            .games
            .update(game.id, &patch, services.clock.now())
            .await?;
        let explanation = reply.explanation.trim();
        AccusationVerdict {
            correct: true,
            message: if explanation.is_empty() {
                ACCUSATION_CORRECT_MESSAGE.to_owned()
            } else {
                explanation.to_owned()
            },
            status: game.status,
        }
    } else {
        AccusationVerdict {
            correct: false,
            message: guarded_explanation(&reply.explanation, &solution.correct_suspect),
            status: game.status,
        }
    };

    info!(
        correlation_id = %command.correlation_id(),
        correct = verdict.correct,
        "accusation judged"
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use hauntcam_core::error::DomainError;
    use hauntcam_core::generative::OutputConfig;
    use hauntcam_core::model::GameStatus;
    use uuid::Uuid;

    use crate::application::accusation_judge::handle_accusation;
    use crate::application::testing::Harness;
    use crate::domain::commands::SubmitAccusation;
    use crate::domain::messages::ACCUSATION_RETRY_MESSAGE;

    fn accusation(game_id: Uuid, suspect: &str) -> SubmitAccusation {
        SubmitAccusation {
            correlation_id: Uuid::new_v4(),
            game_id,
            suspect: suspect.to_owned(),
            reasoning: "The tea was still warm at midnight.".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_accusation_with_items_left_makes_no_classifier_call() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup"]).await;

        // Act
        let result = handle_accusation(&accusation(game_id, "Butler"), &h.services()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
        assert_eq!(h.client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_correct_verdict_solves_the_game() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup", "clock"]).await;
        h.script_text(r#"{"correct": true, "explanation": "Well reasoned."}"#);

        // Act
        let verdict = handle_accusation(&accusation(game_id, "Butler"), &h.services())
            .await
            .unwrap();

        // Assert
        assert!(verdict.correct);
        assert_eq!(verdict.message, "Well reasoned.");
        assert_eq!(verdict.status, GameStatus::Solved);
        assert_eq!(h.games.snapshot(game_id).unwrap().status, GameStatus::Solved);
        let request = &h.client.requests()[0];
        assert_eq!(request.model, h.models.judge);
        assert!(matches!(request.output, OutputConfig::Structured { .. }));
    }

    #[tokio::test]
    async fn test_malformed_verdict_fails_safe() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup", "clock"]).await;
        h.script_text("{ correct: maybe");

        // Act
        let verdict = handle_accusation(&accusation(game_id, "Butler"), &h.services())
            .await
            .unwrap();

        // Assert
        assert!(!verdict.correct);
        assert_eq!(verdict.message, ACCUSATION_RETRY_MESSAGE);
        assert_eq!(h.games.snapshot(game_id).unwrap().status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn test_incorrect_verdict_never_discloses_the_culprit() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup", "clock"]).await;
        h.script_text(r#"{"correct": false, "explanation": "Wrong, it was the butler."}"#);

        // Act
        let verdict = handle_accusation(&accusation(game_id, "Gardener"), &h.services())
            .await
            .unwrap();

        // Assert
        assert!(!verdict.correct);
        assert!(!verdict.message.to_lowercase().contains("butler"));
        assert_eq!(verdict.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn test_accusation_on_solved_game_is_invalid_state() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup", "clock"]).await;
        h.script_text(r#"{"correct": true, "explanation": ""}"#);
        handle_accusation(&accusation(game_id, "Butler"), &h.services())
            .await
            .unwrap();

        // Act
        let result = handle_accusation(&accusation(game_id, "Butler"), &h.services()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
        assert_eq!(h.client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_suspect_is_rejected_without_call() {
        // Arrange
        let h = Harness::new();
        let game_id = h.game_with(&["cup", "clock"]).await;

        // Act
        let result = handle_accusation(&accusation(game_id, "  "), &h.services()).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(h.client.call_count(), 0);
    }
}
