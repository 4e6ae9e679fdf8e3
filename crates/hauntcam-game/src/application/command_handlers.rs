//! Command handlers for the game context.
//!
//! Each handler loads the game, checks the transition in
//! [`state_machine`](crate::domain::state_machine), and persists it through the
//! repository's atomic operations.

use hauntcam_core::clock::Clock;
use hauntcam_core::command::Command;
use hauntcam_core::error::DomainError;
use hauntcam_core::model::{Game, GameMode, GameStatus, NewGame};
use hauntcam_core::repository::GameRepository;
use hauntcam_scenario::ScenarioStore;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::commands::{CreateGame, PatchGame, SubmitAnswer, UnlockHint};
use crate::domain::state_machine::{self, AnswerOutcome};

/// Result of unlocking a hint.
#[derive(Debug, Clone, Serialize)]
pub struct HintUnlocked {
    /// The game.
    pub game_id: Uuid,
    /// Chapter the hint belongs to.
    pub chapter: u32,
    /// Zero-based hint index.
    pub hint_index: u32,
    /// Hint text.
    pub hint: String,
}

/// Result of answering a chapter.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    /// The game.
    pub game_id: Uuid,
    /// Whether the keyword matched.
    pub correct: bool,
    /// Chapter the game moved to, when it advanced.
    pub next_chapter: Option<u32>,
    /// Whether the answer ended the game.
    pub solved: bool,
    /// Game status after the answer.
    pub status: GameStatus,
}

/// Handles the `CreateGame` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank player name or persona, or a
/// repository error.
pub async fn handle_create_game(
    command: &CreateGame,
    default_mode: GameMode,
    clock: &dyn Clock,
    repo: &dyn GameRepository,
) -> Result<Game, DomainError> {
    let player_name = command.player_name.trim();
    if player_name.is_empty() {
        return Err(DomainError::Validation(
            "player_name must not be blank".to_owned(),
        ));
    }
    state_machine::validate_persona(command.persona.as_ref())?;

    let game = repo
        .create(
            NewGame {
                player_name: player_name.to_owned(),
                mode: command.mode.unwrap_or(default_mode),
                persona: command.persona.clone(),
            },
            clock.now(),
        )
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        game_id = %game.id,
        mode = game.mode.as_str(),
        "game created"
    );
    Ok(game)
}

/// Handles the `PatchGame` command.
///
/// Raising the chapter also resets the unlocked hints.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game,
/// `DomainError::InvalidState` for a backward transition or a solved game, and
/// `DomainError::Validation` for an empty patch or an unknown chapter.
pub async fn handle_patch_game(
    command: &PatchGame,
    clock: &dyn Clock,
    repo: &dyn GameRepository,
    scenario: &ScenarioStore,
) -> Result<Game, DomainError> {
    let game = repo.get(command.game_id).await?;
    state_machine::validate_patch(&game, &command.patch)?;

    let mut patch = command.patch.clone();
    if let Some(chapter) = patch.current_chapter {
        if scenario.chapter(chapter).is_err() {
            return Err(DomainError::Validation(format!(
                "chapter {chapter} does not exist"
            )));
        }
        if chapter > game.current_chapter {
            patch.clear_unlocked_hints = true;
        }
    }

    let updated = repo.update(command.game_id, &patch, clock.now()).await?;
    info!(
        correlation_id = %command.correlation_id(),
        game_id = %updated.id,
        status = updated.status.as_str(),
        chapter = updated.current_chapter,
        "game patched"
    );
    Ok(updated)
}

/// Handles the `UnlockHint` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game or chapter and
/// `DomainError::InvalidState` for an out-of-range or duplicate index.
pub async fn handle_unlock_hint(
    command: &UnlockHint,
    clock: &dyn Clock,
    repo: &dyn GameRepository,
    scenario: &ScenarioStore,
) -> Result<HintUnlocked, DomainError> {
    let game = repo.get(command.game_id).await?;
    let chapter = scenario.chapter(game.current_chapter)?;
    state_machine::validate_hint_unlock(&game, chapter, command.hint_index)?;

    let added = repo
        .add_unlocked_hint(command.game_id, command.hint_index, clock.now())
        .await?;
    if !added {
        return Err(state_machine::duplicate_hint(command.hint_index));
    }

    let hint = chapter
        .hint(command.hint_index)
        .map(str::to_owned)
        .unwrap_or_default();
    debug!(
        correlation_id = %command.correlation_id(),
        game_id = %game.id,
        chapter = chapter.number,
        hint_index = command.hint_index,
        "hint unlocked"
    );
    Ok(HintUnlocked {
        game_id: game.id,
        chapter: chapter.number,
        hint_index: command.hint_index,
        hint,
    })
}

/// Handles the `SubmitAnswer` command.
///
/// A match advances to the next chapter, or solves the game on the last one.
/// A miss changes nothing.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game or chapter and
/// `DomainError::InvalidState` for a solved game.
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    clock: &dyn Clock,
    repo: &dyn GameRepository,
    scenario: &ScenarioStore,
) -> Result<AnswerResult, DomainError> {
    let game = repo.get(command.game_id).await?;
    let chapter = scenario.chapter(game.current_chapter)?;
    let outcome = state_machine::evaluate_answer(
        &game,
        chapter,
        scenario.has_next_chapter(chapter.number),
        &command.answer,
    )?;

    let game = match state_machine::answer_patch(&game, outcome) {
        Some(patch) => repo.update(command.game_id, &patch, clock.now()).await?,
        None => game,
    };

    info!(
        correlation_id = %command.correlation_id(),
        game_id = %game.id,
        correct = outcome != AnswerOutcome::Incorrect,
        chapter = game.current_chapter,
        "answer submitted"
    );
    Ok(AnswerResult {
        game_id: game.id,
        correct: outcome != AnswerOutcome::Incorrect,
        next_chapter: match outcome {
            AnswerOutcome::Advance { next_chapter } => Some(next_chapter),
            _ => None,
        },
        solved: game.is_solved(),
        status: game.status,
    })
}
