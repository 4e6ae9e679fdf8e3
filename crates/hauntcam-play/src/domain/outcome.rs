//! Results of the play flows.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use hauntcam_core::model::{GameStatus, Photo};
use hauntcam_vision::domain::detection::Detection;
use serde::Serialize;
use uuid::Uuid;

/// Result of one photo turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The game.
    pub game_id: Uuid,
    /// The stored photo record.
    pub photo_id: Uuid,
    /// Public reference of the uploaded photo.
    pub original_url: String,
    /// Normalized detection.
    pub detection: Detection,
    /// Accepted item key, if any.
    pub detected_item: Option<String>,
    /// Public reference of the overlay; `None` when synthesis failed.
    pub overlay_url: Option<String>,
    /// Text returned with the overlay.
    pub overlay_message: Option<String>,
    /// Cleared items after this turn.
    pub cleared_items: BTreeSet<String>,
    /// Items still to find.
    pub remaining_items: BTreeSet<String>,
    /// Game status after this turn.
    pub status: GameStatus,
    /// Whether the game is solved.
    pub solved: bool,
    /// Whether the final accusation is now allowed.
    pub ready_to_accuse: bool,
    /// Scenario hint for what happened.
    pub hint_message: Option<String>,
    /// Progress message.
    pub message: String,
}

/// Result of an accusation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccusationVerdict {
    /// Whether the accusation was judged correct.
    pub correct: bool,
    /// Message for the player.
    pub message: String,
    /// Game status after the accusation.
    pub status: GameStatus,
}

/// Read-only view of a photo.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    /// The photo identifier.
    pub id: Uuid,
    /// The owning game.
    pub game_id: Uuid,
    /// Per-game sequence number.
    pub sequence: u32,
    /// Chapter at the time of the turn.
    pub chapter: u32,
    /// Public reference of the original.
    pub original_url: String,
    /// Public reference of the overlay.
    pub overlay_url: Option<String>,
    /// Gesture the ghost was drawn with.
    pub overlay_gesture: Option<String>,
    /// Text returned with the overlay.
    pub overlay_message: Option<String>,
    /// Item cleared by this photo.
    pub detected_item: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Photo> for PhotoView {
    fn from(photo: Photo) -> Self {
        let (overlay_url, overlay_gesture, overlay_message) = match photo.overlay {
            Some(overlay) => (Some(overlay.url), Some(overlay.gesture), overlay.message),
            None => (None, None, None),
        };
        Self {
            id: photo.id,
            game_id: photo.game_id,
            sequence: photo.sequence,
            chapter: photo.chapter,
            original_url: photo.original_url,
            overlay_url,
            overlay_gesture,
            overlay_message,
            detected_item: photo.detected_item,
            created_at: photo.created_at,
        }
    }
}
