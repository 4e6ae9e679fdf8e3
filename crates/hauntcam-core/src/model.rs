//! Typed game and photo records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Phase a chapter starts in, and the phase restored on chapter advance.
pub const INITIAL_PHASE: &str = "story";

/// Appearance used when a game has no persona of its own.
pub const DEFAULT_PERSONA_DESCRIPTION: &str =
    "The ghost of a young girl with long black hair, wearing a white dress, with a sorrowful face.";

/// Lifecycle status of a game. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Created, no progress yet.
    Waiting,
    /// At least one progress-producing operation happened.
    Playing,
    /// Terminal.
    Solved,
}

impl GameStatus {
    /// Position in the forward-only order `waiting < playing < solved`.
    #[must_use]
    pub fn rank(self) -> i16 {
        match self {
            Self::Waiting => 0,
            Self::Playing => 1,
            Self::Solved => 2,
        }
    }

    /// Inverse of [`GameStatus::rank`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` for an unknown rank.
    pub fn from_rank(rank: i16) -> Result<Self, DomainError> {
        match rank {
            0 => Ok(Self::Waiting),
            1 => Ok(Self::Playing),
            2 => Ok(Self::Solved),
            other => Err(DomainError::Infrastructure(format!(
                "unknown game status rank {other}"
            ))),
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Solved => "solved",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a game's item catalog and completion rule are derived.
///
/// Chosen once when the game is created and carried on the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Flat item table; clearing everything unlocks the accusation.
    #[default]
    ItemCatalog,
    /// One item per chapter; clearing the final chapter's item solves the game.
    ChapterLinear,
}

impl GameMode {
    /// Wire name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ItemCatalog => "item_catalog",
            Self::ChapterLinear => "chapter_linear",
        }
    }
}

impl FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "item_catalog" => Ok(Self::ItemCatalog),
            "chapter_linear" => Ok(Self::ChapterLinear),
            other => Err(DomainError::Validation(format!("unknown game mode: {other}"))),
        }
    }
}

/// What the ghost looks like: free text or a stored reference image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Persona {
    /// Descriptive appearance text.
    Description(String),
    /// Blob locator of a reference portrait.
    Reference(String),
}

/// A game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier.
    pub id: Uuid,
    /// Display name of the player.
    pub player_name: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Catalog/completion variant. Older records default to `ItemCatalog`.
    #[serde(default)]
    pub mode: GameMode,
    /// Current chapter number, starting at 1.
    pub current_chapter: u32,
    /// Phase within the current chapter.
    pub phase: String,
    /// Hint indices unlocked in the current chapter.
    #[serde(default)]
    pub unlocked_hints: BTreeSet<u32>,
    /// Item keys whose detection has been recorded.
    #[serde(default)]
    pub cleared_items: BTreeSet<String>,
    /// Number of photos submitted so far; the next photo uses `photo_count + 1`.
    #[serde(default)]
    pub photo_count: u32,
    /// Ghost appearance. `None` means the default description.
    #[serde(default)]
    pub persona: Option<Persona>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Whether the game reached its terminal status.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.status == GameStatus::Solved
    }
}

/// Fields supplied when creating a game.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// Display name of the player.
    pub player_name: String,
    /// Catalog/completion variant.
    pub mode: GameMode,
    /// Optional ghost appearance.
    pub persona: Option<Persona>,
}

/// Merge-patch over a game record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamePatch {
    /// New status; persistence never lets it move backward.
    pub status: Option<GameStatus>,
    /// New chapter; persistence never lets it decrease.
    pub current_chapter: Option<u32>,
    /// New phase.
    pub phase: Option<String>,
    /// New persona.
    pub persona: Option<Persona>,
    /// Empty the unlocked hints (chapter advance).
    pub clear_unlocked_hints: bool,
}

impl GamePatch {
    /// True when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.current_chapter.is_none()
            && self.phase.is_none()
            && self.persona.is_none()
            && !self.clear_unlocked_hints
    }
}

/// A stored photo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Photo identifier.
    pub id: Uuid,
    /// Owning game.
    pub game_id: Uuid,
    /// Per-game sequence number the storage paths derive from.
    pub sequence: u32,
    /// Chapter the game was in when the photo was taken.
    pub chapter: u32,
    /// Blob locator of the uploaded image.
    pub original_path: String,
    /// Public reference of the uploaded image.
    pub original_url: String,
    /// Synthesized overlay, set at most once.
    pub overlay: Option<PhotoOverlay>,
    /// Item accepted by detection for this photo.
    pub detected_item: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The overlay half of a photo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoOverlay {
    /// Blob locator of the overlay image.
    pub path: String,
    /// Public reference of the overlay image.
    pub url: String,
    /// Gesture cue the overlay was generated with.
    pub gesture: String,
    /// Companion text returned by the synthesizer.
    pub message: Option<String>,
}

/// Fields supplied when creating a photo.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    /// Owning game.
    pub game_id: Uuid,
    /// Per-game sequence number.
    pub sequence: u32,
    /// Chapter at upload time.
    pub chapter: u32,
    /// Blob locator of the uploaded image.
    pub original_path: String,
    /// Public reference of the uploaded image.
    pub original_url: String,
    /// Item accepted by detection, if any.
    pub detected_item: Option<String>,
}
