//! `PostgreSQL` implementation of the `PhotoRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use hauntcam_core::error::DomainError;
use hauntcam_core::model::{NewPhoto, Photo, PhotoOverlay};
use hauntcam_core::repository::PhotoRepository;

use crate::pg_game_repository::{db_error, from_db_int, to_db_int};
use crate::schema::PHOTO_COLUMNS;

/// PostgreSQL-backed photo repository.
#[derive(Debug, Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    /// Creates a new `PgPhotoRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn photo_from_row(row: &PgRow) -> Result<Photo, DomainError> {
    let overlay_path: Option<String> = row.try_get("overlay_path").map_err(db_error)?;
    let overlay = match overlay_path {
        Some(path) => Some(PhotoOverlay {
            path,
            url: row
                .try_get::<Option<String>, _>("overlay_url")
                .map_err(db_error)?
                .unwrap_or_default(),
            gesture: row
                .try_get::<Option<String>, _>("overlay_gesture")
                .map_err(db_error)?
                .unwrap_or_default(),
            message: row.try_get("overlay_message").map_err(db_error)?,
        }),
        None => None,
    };

    Ok(Photo {
        id: row.try_get("id").map_err(db_error)?,
        game_id: row.try_get("game_id").map_err(db_error)?,
        sequence: from_db_int(row.try_get("sequence").map_err(db_error)?)?,
        chapter: from_db_int(row.try_get("chapter").map_err(db_error)?)?,
        original_path: row.try_get("original_path").map_err(db_error)?,
        original_url: row.try_get("original_url").map_err(db_error)?,
        overlay,
        detected_item: row.try_get("detected_item").map_err(db_error)?,
        created_at: row.try_get("created_at").map_err(db_error)?,
    })
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn create(&self, new_photo: NewPhoto, now: DateTime<Utc>) -> Result<Photo, DomainError> {
        let sql = format!(
            "INSERT INTO photos (id, game_id, sequence, chapter, original_path, original_url, \
             detected_item, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {PHOTO_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(new_photo.game_id)
            .bind(to_db_int(new_photo.sequence)?)
            .bind(to_db_int(new_photo.chapter)?)
            .bind(&new_photo.original_path)
            .bind(&new_photo.original_url)
            .bind(new_photo.detected_item.as_deref())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        photo_from_row(&row)
    }

    async fn get(&self, photo_id: Uuid) -> Result<Photo, DomainError> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found("photo", photo_id))?;
        photo_from_row(&row)
    }

    async fn list_by_game(&self, game_id: Uuid) -> Result<Vec<Photo>, DomainError> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE game_id = $1 ORDER BY created_at, sequence"
        );
        let rows = sqlx::query(&sql)
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(photo_from_row).collect()
    }

    async fn set_overlay(
        &self,
        photo_id: Uuid,
        overlay: PhotoOverlay,
    ) -> Result<Photo, DomainError> {
        let sql = format!(
            "UPDATE photos SET overlay_path = $2, overlay_url = $3, overlay_gesture = $4, \
             overlay_message = $5 \
             WHERE id = $1 AND overlay_path IS NULL RETURNING {PHOTO_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(photo_id)
            .bind(&overlay.path)
            .bind(&overlay.url)
            .bind(&overlay.gesture)
            .bind(overlay.message.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        match row {
            Some(row) => photo_from_row(&row),
            None => {
                self.get(photo_id).await?;
                Err(DomainError::InvalidState(format!(
                    "photo {photo_id} already has an overlay"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hauntcam_core::clock::Clock;
    use hauntcam_core::model::{GameMode, NewGame};
    use hauntcam_core::repository::GameRepository;
    use hauntcam_test_support::FixedClock;

    use super::*;
    use crate::pg_game_repository::PgGameRepository;

    async fn photo_for_new_game(pool: &PgPool) -> (PgPhotoRepository, Photo) {
        let now = FixedClock::standard().now();
        let game = PgGameRepository::new(pool.clone())
            .create(
                NewGame {
                    player_name: "Aki".to_owned(),
                    mode: GameMode::ItemCatalog,
                    persona: None,
                },
                now,
            )
            .await
            .unwrap();
        let repo = PgPhotoRepository::new(pool.clone());
        let photo = repo
            .create(
                NewPhoto {
                    game_id: game.id,
                    sequence: 1,
                    chapter: 1,
                    original_path: format!("games/{}/photos/001_original.jpg", game.id),
                    original_url: "http://localhost/blobs/x".to_owned(),
                    detected_item: Some("cup".to_owned()),
                },
                now,
            )
            .await
            .unwrap();
        (repo, photo)
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a PostgreSQL database"]
    async fn test_overlay_is_set_at_most_once(pool: PgPool) {
        // Arrange
        let (repo, photo) = photo_for_new_game(&pool).await;
        let overlay = PhotoOverlay {
            path: "ghost.png".to_owned(),
            url: "http://localhost/blobs/ghost.png".to_owned(),
            gesture: "pointing".to_owned(),
            message: Some("Boo.".to_owned()),
        };

        // Act
        let updated = repo.set_overlay(photo.id, overlay.clone()).await.unwrap();
        let second = repo.set_overlay(photo.id, overlay.clone()).await;

        // Assert
        assert_eq!(updated.overlay, Some(overlay));
        assert!(matches!(second, Err(DomainError::InvalidState(_))));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires a PostgreSQL database"]
    async fn test_list_by_game_returns_stored_photos(pool: PgPool) {
        // Arrange
        let (repo, photo) = photo_for_new_game(&pool).await;

        // Act
        let photos = repo.list_by_game(photo.game_id).await.unwrap();

        // Assert
        assert_eq!(photos, vec![photo]);
    }
}
