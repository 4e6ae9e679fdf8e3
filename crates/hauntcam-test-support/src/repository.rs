//! Test repositories — in-memory `GameRepository` and `PhotoRepository`.
//!
//! Each operation runs under a single mutex acquisition, so the add-to-set
//! operations are atomic in the same sense the PostgreSQL ones are.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hauntcam_core::error::DomainError;
use hauntcam_core::model::{
    Game, GamePatch, GameStatus, INITIAL_PHASE, NewGame, NewPhoto, Photo, PhotoOverlay,
};
use hauntcam_core::repository::{GameRepository, PhotoRepository};
use uuid::Uuid;

/// An in-memory game repository.
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: Mutex<HashMap<Uuid, Game>>,
}

impl InMemoryGameRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, for arranging tests.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert(&self, game: Game) {
        self.games.lock().unwrap().insert(game.id, game);
    }

    /// Returns a snapshot of a stored record.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self, game_id: Uuid) -> Option<Game> {
        self.games.lock().unwrap().get(&game_id).cloned()
    }

    fn with_game<T>(
        &self,
        game_id: Uuid,
        f: impl FnOnce(&mut Game) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut games = self.games.lock().unwrap();
        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| DomainError::not_found("game", game_id))?;
        f(game)
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create(&self, new_game: NewGame, now: DateTime<Utc>) -> Result<Game, DomainError> {
        let game = Game {
            id: Uuid::new_v4(),
            player_name: new_game.player_name,
            status: GameStatus::Waiting,
            mode: new_game.mode,
            current_chapter: 1,
            phase: INITIAL_PHASE.to_owned(),
            unlocked_hints: BTreeSet::new(),
            cleared_items: BTreeSet::new(),
            photo_count: 0,
            persona: new_game.persona,
            created_at: now,
            updated_at: now,
        };
        self.insert(game.clone());
        Ok(game)
    }

    async fn get(&self, game_id: Uuid) -> Result<Game, DomainError> {
        self.with_game(game_id, |game| Ok(game.clone()))
    }

    async fn update(
        &self,
        game_id: Uuid,
        patch: &GamePatch,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        self.with_game(game_id, |game| {
            if let Some(status) = patch.status {
                game.status = game.status.max(status);
            }
            if let Some(chapter) = patch.current_chapter {
                game.current_chapter = game.current_chapter.max(chapter);
            }
            if let Some(phase) = &patch.phase {
                game.phase.clone_from(phase);
            }
            if let Some(persona) = &patch.persona {
                game.persona = Some(persona.clone());
            }
            if patch.clear_unlocked_hints {
                game.unlocked_hints.clear();
            }
            game.updated_at = now;
            Ok(game.clone())
        })
    }

    async fn add_cleared_item(
        &self,
        game_id: Uuid,
        item: &str,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        self.with_game(game_id, |game| {
            if game.status == GameStatus::Solved {
                return Err(DomainError::InvalidState("game already solved".to_owned()));
            }
            game.cleared_items.insert(item.to_owned());
            game.status = game.status.max(GameStatus::Playing);
            game.updated_at = now;
            Ok(game.clone())
        })
    }

    async fn add_unlocked_hint(
        &self,
        game_id: Uuid,
        index: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.with_game(game_id, |game| {
            let inserted = game.unlocked_hints.insert(index);
            if inserted {
                game.updated_at = now;
            }
            Ok(inserted)
        })
    }

    async fn next_photo_sequence(
        &self,
        game_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        self.with_game(game_id, |game| {
            game.photo_count += 1;
            game.updated_at = now;
            Ok(game.photo_count)
        })
    }
}

/// A game repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingGameRepository;

fn refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl GameRepository for FailingGameRepository {
    async fn create(&self, _new_game: NewGame, _now: DateTime<Utc>) -> Result<Game, DomainError> {
        refused()
    }

    async fn get(&self, _game_id: Uuid) -> Result<Game, DomainError> {
        refused()
    }

    async fn update(
        &self,
        _game_id: Uuid,
        _patch: &GamePatch,
        _now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        refused()
    }

    async fn add_cleared_item(
        &self,
        _game_id: Uuid,
        _item: &str,
        _now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        refused()
    }

    async fn add_unlocked_hint(
        &self,
        _game_id: Uuid,
        _index: u32,
        _now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        refused()
    }

    async fn next_photo_sequence(
        &self,
        _game_id: Uuid,
        _now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        refused()
    }
}

/// An in-memory photo repository.
#[derive(Debug, Default)]
pub struct InMemoryPhotoRepository {
    photos: Mutex<Vec<Photo>>,
}

impl InMemoryPhotoRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored photo in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Photo> {
        self.photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn create(&self, new_photo: NewPhoto, now: DateTime<Utc>) -> Result<Photo, DomainError> {
        let photo = Photo {
            id: Uuid::new_v4(),
            game_id: new_photo.game_id,
            sequence: new_photo.sequence,
            chapter: new_photo.chapter,
            original_path: new_photo.original_path,
            original_url: new_photo.original_url,
            overlay: None,
            detected_item: new_photo.detected_item,
            created_at: now,
        };
        self.photos.lock().unwrap().push(photo.clone());
        Ok(photo)
    }

    async fn get(&self, photo_id: Uuid) -> Result<Photo, DomainError> {
        self.photos
            .lock()
            .unwrap()
            .iter()
            .find(|photo| photo.id == photo_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("photo", photo_id))
    }

    async fn list_by_game(&self, game_id: Uuid) -> Result<Vec<Photo>, DomainError> {
        let mut photos: Vec<Photo> = self
            .photos
            .lock()
            .unwrap()
            .iter()
            .filter(|photo| photo.game_id == game_id)
            .cloned()
            .collect();
        photos.sort_by_key(|photo| (photo.created_at, photo.sequence));
        Ok(photos)
    }

    async fn set_overlay(
        &self,
        photo_id: Uuid,
        overlay: PhotoOverlay,
    ) -> Result<Photo, DomainError> {
        let mut photos = self.photos.lock().unwrap();
        let photo = photos
            .iter_mut()
            .find(|photo| photo.id == photo_id)
            .ok_or_else(|| DomainError::not_found("photo", photo_id))?;
        if photo.overlay.is_some() {
            return Err(DomainError::InvalidState(format!(
                "photo {photo_id} already has an overlay"
            )));
        }
        photo.overlay = Some(overlay);
        Ok(photo.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use hauntcam_core::clock::Clock;
    use hauntcam_core::model::GameMode;

    fn new_game() -> NewGame {
        NewGame {
            player_name: "Aki".to_owned(),
            mode: GameMode::ItemCatalog,
            persona: None,
        }
    }

    #[tokio::test]
    async fn test_add_cleared_item_is_idempotent_and_starts_play() {
        // Arrange
        let repo = InMemoryGameRepository::new();
        let now = FixedClock::standard().now();
        let game = repo.create(new_game(), now).await.unwrap();

        // Act
        repo.add_cleared_item(game.id, "cup", now).await.unwrap();
        let game = repo.add_cleared_item(game.id, "cup", now).await.unwrap();

        // Assert
        assert_eq!(game.cleared_items.len(), 1);
        assert_eq!(game.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn test_update_never_moves_status_backward() {
        // Arrange
        let repo = InMemoryGameRepository::new();
        let now = FixedClock::standard().now();
        let game = repo.create(new_game(), now).await.unwrap();
        let solve = GamePatch {
            status: Some(GameStatus::Solved),
            ..GamePatch::default()
        };
        repo.update(game.id, &solve, now).await.unwrap();

        // Act
        let back = GamePatch {
            status: Some(GameStatus::Playing),
            current_chapter: Some(0),
            ..GamePatch::default()
        };
        let game = repo.update(game.id, &back, now).await.unwrap();

        // Assert
        assert_eq!(game.status, GameStatus::Solved);
        assert_eq!(game.current_chapter, 1);
    }

    #[tokio::test]
    async fn test_set_overlay_twice_is_rejected() {
        // Arrange
        let repo = InMemoryPhotoRepository::new();
        let now = FixedClock::standard().now();
        let photo = repo
            .create(
                NewPhoto {
                    game_id: Uuid::new_v4(),
                    sequence: 1,
                    chapter: 1,
                    original_path: "p".to_owned(),
                    original_url: "u".to_owned(),
                    detected_item: None,
                },
                now,
            )
            .await
            .unwrap();
        let overlay = PhotoOverlay {
            path: "g".to_owned(),
            url: "gu".to_owned(),
            gesture: "mourning".to_owned(),
            message: None,
        };
        repo.set_overlay(photo.id, overlay.clone()).await.unwrap();

        // Act
        let result = repo.set_overlay(photo.id, overlay).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }
}
