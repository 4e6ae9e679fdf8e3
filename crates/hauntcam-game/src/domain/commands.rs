//! Commands for the game context.

use hauntcam_core::command::Command;
use hauntcam_core::model::{GameMode, GamePatch, Persona};
use uuid::Uuid;

/// Command to start a new game.
#[derive(Debug, Clone)]
pub struct CreateGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Display name of the player.
    pub player_name: String,
    /// Progression mode; the server default when absent.
    pub mode: Option<GameMode>,
    /// Ghost persona chosen up front.
    pub persona: Option<Persona>,
}

impl Command for CreateGame {
    fn command_type(&self) -> &'static str {
        "game.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to merge-patch a game.
#[derive(Debug, Clone)]
pub struct PatchGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game to update.
    pub game_id: Uuid,
    /// Fields to change.
    pub patch: GamePatch,
}

impl Command for PatchGame {
    fn command_type(&self) -> &'static str {
        "game.patch"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}

/// Command to unlock a hint of the current chapter.
#[derive(Debug, Clone)]
pub struct UnlockHint {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// Zero-based hint index.
    pub hint_index: u32,
}

impl Command for UnlockHint {
    fn command_type(&self) -> &'static str {
        "game.unlock_hint"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}

/// Command to answer the current chapter.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// The player's answer.
    pub answer: String,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "game.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}
