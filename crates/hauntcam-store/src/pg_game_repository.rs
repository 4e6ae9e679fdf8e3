//! `PostgreSQL` implementation of the `GameRepository` trait.
//!
//! Monotonic fields use `GREATEST` and set-valued fields use `array_append`
//! guarded by `NOT (x = ANY(...))`, so concurrent writers never lose each
//! other's updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use hauntcam_core::error::DomainError;
use hauntcam_core::model::{Game, GamePatch, GameStatus, INITIAL_PHASE, NewGame, Persona};
use hauntcam_core::repository::GameRepository;

use crate::schema::GAME_COLUMNS;

/// PostgreSQL-backed game repository.
#[derive(Debug, Clone)]
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    /// Creates a new `PgGameRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

pub(crate) fn to_db_int(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::Validation(format!("{value} is out of range")))
}

pub(crate) fn from_db_int(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| DomainError::Infrastructure(format!("negative counter {value} in database")))
}

fn game_from_row(row: &PgRow) -> Result<Game, DomainError> {
    let mode: String = row.try_get("mode").map_err(db_error)?;
    let hints: Vec<i32> = row.try_get("unlocked_hints").map_err(db_error)?;
    let cleared: Vec<String> = row.try_get("cleared_items").map_err(db_error)?;
    let persona: Option<Json<Persona>> = row.try_get("persona").map_err(db_error)?;

    Ok(Game {
        id: row.try_get("id").map_err(db_error)?,
        player_name: row.try_get("player_name").map_err(db_error)?,
        status: GameStatus::from_rank(row.try_get("status").map_err(db_error)?)?,
        mode: mode
            .parse()
            .map_err(|e: DomainError| DomainError::Infrastructure(e.to_string()))?,
        current_chapter: from_db_int(row.try_get("current_chapter").map_err(db_error)?)?,
        phase: row.try_get("phase").map_err(db_error)?,
        unlocked_hints: hints
            .into_iter()
            .map(from_db_int)
            .collect::<Result<_, _>>()?,
        cleared_items: cleared.into_iter().collect(),
        photo_count: from_db_int(row.try_get("photo_count").map_err(db_error)?)?,
        persona: persona.map(|Json(persona)| persona),
        created_at: row.try_get("created_at").map_err(db_error)?,
        updated_at: row.try_get("updated_at").map_err(db_error)?,
    })
}

#[async_trait]
impl GameRepository for PgGameRepository {
    async fn create(&self, new_game: NewGame, now: DateTime<Utc>) -> Result<Game, DomainError> {
        let sql = format!(
            "INSERT INTO games (id, player_name, status, mode, current_chapter, phase, persona, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 1, $5, $6, $7, $7) RETURNING {GAME_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_game.player_name)
            .bind(GameStatus::Waiting.rank())
            .bind(new_game.mode.as_str())
            .bind(INITIAL_PHASE)
            .bind(new_game.persona.map(Json))
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        let game = game_from_row(&row)?;
        debug!(game_id = %game.id, "game row inserted");
        Ok(game)
    }

    async fn get(&self, game_id: Uuid) -> Result<Game, DomainError> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found("game", game_id))?;
        game_from_row(&row)
    }

    async fn update(
        &self,
        game_id: Uuid,
        patch: &GamePatch,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        let sql = format!(
            "UPDATE games SET \
               status = GREATEST(status, COALESCE($2, status)), \
               current_chapter = GREATEST(current_chapter, COALESCE($3, current_chapter)), \
               phase = COALESCE($4, phase), \
               persona = COALESCE($5, persona), \
               unlocked_hints = CASE WHEN $6 THEN '{{}}'::INTEGER[] ELSE unlocked_hints END, \
               updated_at = $7 \
             WHERE id = $1 RETURNING {GAME_COLUMNS}"
        );
        let chapter = patch.current_chapter.map(to_db_int).transpose()?;
        let row = sqlx::query(&sql)
            .bind(game_id)
            .bind(patch.status.map(GameStatus::rank))
            .bind(chapter)
            .bind(patch.phase.as_deref())
            .bind(patch.persona.clone().map(Json))
            .bind(patch.clear_unlocked_hints)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::not_found("game", game_id))?;
        game_from_row(&row)
    }

    async fn add_cleared_item(
        &self,
        game_id: Uuid,
        item: &str,
        now: DateTime<Utc>,
    ) -> Result<Game, DomainError> {
        let sql = format!(
            "UPDATE games SET \
               cleared_items = CASE WHEN $2 = ANY(cleared_items) THEN cleared_items \
                                    ELSE array_append(cleared_items, $2) END, \
               status = GREATEST(status, $3), \
               updated_at = $4 \
             WHERE id = $1 AND status <> $5 RETURNING {GAME_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(game_id)
            .bind(item)
            .bind(GameStatus::Playing.rank())
            .bind(now)
            .bind(GameStatus::Solved.rank())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        match row {
            Some(row) => game_from_row(&row),
            None => {
                // Either absent or solved; `get` tells which.
                self.get(game_id).await?;
                Err(DomainError::InvalidState(format!(
                    "game {game_id} is already solved"
                )))
            }
        }
    }

    async fn add_unlocked_hint(
        &self,
        game_id: Uuid,
        index: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let added = sqlx::query(
            "UPDATE games SET unlocked_hints = array_append(unlocked_hints, $2), updated_at = $3 \
             WHERE id = $1 AND NOT ($2 = ANY(unlocked_hints)) RETURNING id",
        )
        .bind(game_id)
        .bind(to_db_int(index)?)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        if added.is_some() {
            return Ok(true);
        }
        self.get(game_id).await?;
        Ok(false)
    }

    async fn next_photo_sequence(
        &self,
        game_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u32, DomainError> {
        let row = sqlx::query(
            "UPDATE games SET photo_count = photo_count + 1, updated_at = $2 \
             WHERE id = $1 RETURNING photo_count",
        )
        .bind(game_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| DomainError::not_found("game", game_id))?;
        from_db_int(row.try_get("photo_count").map_err(db_error)?)
    }
}
