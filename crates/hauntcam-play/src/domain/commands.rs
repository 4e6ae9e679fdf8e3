//! Commands for the play context.

use hauntcam_core::command::Command;
use hauntcam_core::generative::ImageData;
use uuid::Uuid;

/// Command to play one photo turn.
#[derive(Debug, Clone)]
pub struct PlayTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// The uploaded photo.
    pub photo: ImageData,
}

impl Command for PlayTurn {
    fn command_type(&self) -> &'static str {
        "play.turn"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}

/// Command to name the culprit.
#[derive(Debug, Clone)]
pub struct SubmitAccusation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// Named suspect.
    pub suspect: String,
    /// The player's reasoning.
    pub reasoning: String,
}

impl Command for SubmitAccusation {
    fn command_type(&self) -> &'static str {
        "play.submit_accusation"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}

/// Command to draw a persona portrait and use it as the ghost's reference.
#[derive(Debug, Clone)]
pub struct GenerateAvatar {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// Appearance of the ghost.
    pub description: String,
}

impl Command for GenerateAvatar {
    fn command_type(&self) -> &'static str {
        "play.generate_avatar"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}

/// Command to composite a ghost into a stored photo that has none.
#[derive(Debug, Clone)]
pub struct RegenerateOverlay {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game.
    pub game_id: Uuid,
    /// The photo.
    pub photo_id: Uuid,
}

impl Command for RegenerateOverlay {
    fn command_type(&self) -> &'static str {
        "play.regenerate_overlay"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn game_id(&self) -> Option<Uuid> {
        Some(self.game_id)
    }
}
