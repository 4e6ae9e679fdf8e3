//! Transition rules for a game.
//!
//! Status only moves `waiting → playing → solved`. Cleared items and unlocked
//! hints only grow (hints reset on chapter advance), and the chapter only
//! increases. Nothing mutates a solved game.

use std::collections::BTreeSet;

use hauntcam_core::error::DomainError;
use hauntcam_core::model::{Game, GameMode, GamePatch, GameStatus, INITIAL_PHASE, Persona};
use hauntcam_scenario::domain::catalog::ItemCatalog;
use hauntcam_scenario::domain::chapter::Chapter;

/// Where a game stands after its cleared items changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Items remain.
    InProgress,
    /// Every item is cleared; the accusation is now allowed.
    ReadyToAccuse,
    /// The game is over.
    Solved,
}

/// Result of checking a chapter answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The keyword did not match; nothing changes.
    Incorrect,
    /// The keyword matched and the next chapter begins.
    Advance {
        /// Chapter the game moves to.
        next_chapter: u32,
    },
    /// The keyword matched the last chapter.
    Solve,
}

/// Rejects any mutation of a solved game.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the game is solved.
pub fn ensure_not_solved(game: &Game) -> Result<(), DomainError> {
    if game.is_solved() {
        return Err(DomainError::InvalidState(format!(
            "game {} is already solved",
            game.id
        )));
    }
    Ok(())
}

/// Status after a progress-producing operation.
#[must_use]
pub fn progressed(status: GameStatus) -> GameStatus {
    status.max(GameStatus::Playing)
}

/// Completion state of a game whose cleared set is `cleared`.
///
/// A `ChapterLinear` game only solves while it is on its final chapter.
#[must_use]
pub fn completion(
    mode: GameMode,
    catalog: &ItemCatalog,
    cleared: &BTreeSet<String>,
    on_final_chapter: bool,
) -> Completion {
    let all_cleared = catalog.is_cleared_by(cleared);
    match mode {
        GameMode::ChapterLinear => {
            let final_cleared = catalog
                .final_item()
                .is_some_and(|item| cleared.contains(item));
            if on_final_chapter && (final_cleared || all_cleared) {
                Completion::Solved
            } else {
                Completion::InProgress
            }
        }
        GameMode::ItemCatalog => {
            if all_cleared {
                Completion::ReadyToAccuse
            } else {
                Completion::InProgress
            }
        }
    }
}

/// Checks that `index` can be unlocked in `chapter`.
///
/// Duplicate unlocks are detected atomically by the repository; this only
/// covers the checks that need no storage round trip.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the game is solved, the index is
/// outside the chapter's hints, or the index is already unlocked.
pub fn validate_hint_unlock(game: &Game, chapter: &Chapter, index: u32) -> Result<(), DomainError> {
    ensure_not_solved(game)?;
    if chapter.hint(index).is_none() {
        return Err(DomainError::InvalidState(format!(
            "hint index {index} is out of range for chapter {} ({} hints)",
            chapter.number,
            chapter.hints.len()
        )));
    }
    if game.unlocked_hints.contains(&index) {
        return Err(duplicate_hint(index));
    }
    Ok(())
}

/// The error for re-unlocking a hint.
#[must_use]
pub fn duplicate_hint(index: u32) -> DomainError {
    DomainError::InvalidState(format!("hint {index} is already unlocked"))
}

/// Exact keyword match after trimming and case-folding both sides.
#[must_use]
pub fn answer_matches(keyword: &str, answer: &str) -> bool {
    let answer = answer.trim();
    !answer.is_empty() && keyword.trim().to_lowercase() == answer.to_lowercase()
}

/// Checks an answer for the game's current chapter.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the game is solved.
pub fn evaluate_answer(
    game: &Game,
    chapter: &Chapter,
    has_next_chapter: bool,
    answer: &str,
) -> Result<AnswerOutcome, DomainError> {
    ensure_not_solved(game)?;
    if !answer_matches(&chapter.answer_keyword, answer) {
        return Ok(AnswerOutcome::Incorrect);
    }
    if has_next_chapter {
        Ok(AnswerOutcome::Advance {
            next_chapter: chapter.number + 1,
        })
    } else {
        Ok(AnswerOutcome::Solve)
    }
}

/// The patch that realises an answer outcome, if any.
#[must_use]
pub fn answer_patch(game: &Game, outcome: AnswerOutcome) -> Option<GamePatch> {
    match outcome {
        AnswerOutcome::Incorrect => None,
        AnswerOutcome::Advance { next_chapter } => Some(GamePatch {
            status: Some(progressed(game.status)),
            current_chapter: Some(next_chapter),
            phase: Some(INITIAL_PHASE.to_owned()),
            clear_unlocked_hints: true,
            ..GamePatch::default()
        }),
        AnswerOutcome::Solve => Some(GamePatch {
            status: Some(GameStatus::Solved),
            ..GamePatch::default()
        }),
    }
}

/// Checks an externally requested patch against the monotonicity rules.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty patch or blank values, and
/// `DomainError::InvalidState` for a solved game, a backward status, or a
/// decreasing chapter.
pub fn validate_patch(game: &Game, patch: &GamePatch) -> Result<(), DomainError> {
    if patch.is_empty() {
        return Err(DomainError::Validation("no fields to update".to_owned()));
    }
    ensure_not_solved(game)?;
    if let Some(status) = patch.status {
        if status < game.status {
            return Err(DomainError::InvalidState(format!(
                "status cannot move from {} back to {status}",
                game.status
            )));
        }
    }
    if let Some(chapter) = patch.current_chapter {
        if chapter < game.current_chapter {
            return Err(DomainError::InvalidState(format!(
                "chapter cannot decrease from {} to {chapter}",
                game.current_chapter
            )));
        }
    }
    if patch.phase.as_deref().is_some_and(|phase| phase.trim().is_empty()) {
        return Err(DomainError::Validation("phase must not be blank".to_owned()));
    }
    validate_persona(patch.persona.as_ref())
}

/// Rejects a blank persona description or reference.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the persona text is blank.
pub fn validate_persona(persona: Option<&Persona>) -> Result<(), DomainError> {
    match persona {
        Some(Persona::Description(text) | Persona::Reference(text)) if text.trim().is_empty() => {
            Err(DomainError::Validation("persona must not be blank".to_owned()))
        }
        _ => Ok(()),
    }
}

/// Gate for the final accusation: all items cleared and not yet solved.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if the game is solved or clues remain.
pub fn ensure_accusation_allowed(game: &Game, catalog: &ItemCatalog) -> Result<(), DomainError> {
    ensure_not_solved(game)?;
    let remaining = catalog.remaining(&game.cleared_items);
    if !remaining.is_empty() {
        return Err(DomainError::InvalidState(format!(
            "accusation requires every item to be cleared; {} remaining",
            remaining.len()
        )));
    }
    Ok(())
}
