//! Persistence abstractions for games and photos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Game, GamePatch, NewGame, NewPhoto, Photo, PhotoOverlay};

/// Repository for game records.
///
/// Set-valued fields are only ever grown through the dedicated add-to-set
/// operations, which implementations must perform atomically at the storage
/// layer. A fetch-modify-store of a snapshot loses updates when two turns
/// clear different items concurrently.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Creates a game in `waiting` status with empty sets.
    async fn create(&self, new_game: NewGame, now: DateTime<Utc>) -> Result<Game, DomainError>;

    /// Loads a game.
    ///
    /// Returns `DomainError::NotFound` when absent.
    async fn get(&self, game_id: Uuid) -> Result<Game, DomainError>;

    /// Applies a merge-patch and returns the updated record. Status never
    /// moves backward and the chapter never decreases, even under races.
    async fn update(
        &self,
        game_id: Uuid,
        patch: &GamePatch,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError>;

    /// Atomically adds `item` to `cleared_items` and moves a `waiting` game
    /// to `playing`. Adding an already-cleared item is a no-op.
    ///
    /// Returns `DomainError::InvalidState` if the game is solved.
    async fn add_cleared_item(
        &self,
        game_id: Uuid,
        item: &str,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError>;

    /// Atomically adds `index` to `unlocked_hints`. Returns `false` when the
    /// index was already present.
    async fn add_unlocked_hint(
        &self,
        game_id: Uuid,
        index: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Atomically increments `photo_count` and returns the new value.
    async fn next_photo_sequence(
        &self,
        game_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError>;
}

/// Repository for photo records.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Stores a photo without an overlay.
    async fn create(&self, new_photo: NewPhoto, now: DateTime<Utc>) -> Result<Photo, DomainError>;

    /// Loads a photo.
    async fn get(&self, photo_id: Uuid) -> Result<Photo, DomainError>;

    /// Lists a game's photos ordered by creation time.
    async fn list_by_game(&self, game_id: Uuid) -> Result<Vec<Photo>, DomainError>;

    /// Sets the overlay fields.
    ///
    /// Returns `DomainError::InvalidState` if an overlay is already set.
    async fn set_overlay(&self, photo_id: Uuid, overlay: PhotoOverlay)
    -> Result<Photo, DomainError>;
}
