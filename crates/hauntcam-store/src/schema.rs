//! Database schema: the embedded migrations and the column lists queries
//! select.

use sqlx::migrate::Migrator;

/// Migrations under the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Columns of the `games` table, in the order rows are decoded.
pub const GAME_COLUMNS: &str = "id, player_name, status, mode, current_chapter, phase, \
     unlocked_hints, cleared_items, photo_count, persona, created_at, updated_at";

/// Columns of the `photos` table, in the order rows are decoded.
pub const PHOTO_COLUMNS: &str = "id, game_id, sequence, chapter, original_path, original_url, \
     overlay_path, overlay_url, overlay_gesture, overlay_message, detected_item, created_at";
