//! Query handlers for the game context.
//!
//! These load games from the repository and return read-only view DTOs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use hauntcam_core::error::DomainError;
use hauntcam_core::model::{Game, GameMode, GameStatus, Persona};
use hauntcam_core::repository::GameRepository;
use hauntcam_scenario::ScenarioStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::state_machine::{self, Completion};

/// Read-only view of a game, including its progress against the catalog.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Display name of the player.
    pub player_name: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Progression mode.
    pub mode: GameMode,
    /// Current chapter.
    pub current_chapter: u32,
    /// Current phase label.
    pub phase: String,
    /// Hints unlocked in the current chapter.
    pub unlocked_hints: BTreeSet<u32>,
    /// Items cleared so far.
    pub cleared_items: BTreeSet<String>,
    /// Catalog items not yet cleared.
    pub remaining_items: BTreeSet<String>,
    /// Whether the final accusation is allowed.
    pub ready_to_accuse: bool,
    /// Number of photos submitted.
    pub photo_count: u32,
    /// Ghost persona, if chosen.
    pub persona: Option<Persona>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl GameView {
    /// Builds a view of `game` against the scenario's catalog for its mode.
    #[must_use]
    pub fn new(game: Game, scenario: &ScenarioStore) -> Self {
        let catalog = scenario.catalog(game.mode);
        let remaining_items = catalog.remaining(&game.cleared_items);
        let ready_to_accuse = !game.is_solved()
            && state_machine::completion(
                game.mode,
                &catalog,
                &game.cleared_items,
                !scenario.has_next_chapter(game.current_chapter),
            ) == Completion::ReadyToAccuse;
        Self {
            game_id: game.id,
            player_name: game.player_name,
            status: game.status,
            mode: game.mode,
            current_chapter: game.current_chapter,
            phase: game.phase,
            unlocked_hints: game.unlocked_hints,
            cleared_items: game.cleared_items,
            remaining_items,
            ready_to_accuse,
            photo_count: game.photo_count,
            persona: game.persona,
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

/// Retrieves a game by its ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist.
pub async fn get_game_by_id(
    game_id: Uuid,
    repo: &dyn GameRepository,
    scenario: &ScenarioStore,
) -> Result<GameView, DomainError> {
    let game = repo.get(game_id).await?;
    Ok(GameView::new(game, scenario))
}
