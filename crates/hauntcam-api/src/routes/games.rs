//! Routes for the game lifecycle: create, fetch, patch, hints, answers.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hauntcam_core::model::{GameMode, GamePatch, GameStatus, Persona};
use hauntcam_game::application::command_handlers::{
    self, AnswerResult, HintUnlocked,
};
use hauntcam_game::application::query_handlers::{self, GameView};
use hauntcam_game::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// Display name of the player.
    pub player_name: String,
    /// Progression mode; the server default when absent.
    #[serde(default)]
    pub mode: Option<GameMode>,
    /// Free-text ghost appearance.
    #[serde(default)]
    pub persona_description: Option<String>,
}

/// Request body for PATCH /{id}.
#[derive(Debug, Deserialize)]
pub struct PatchGameRequest {
    /// New status.
    #[serde(default)]
    pub status: Option<GameStatus>,
    /// New chapter.
    #[serde(default)]
    pub current_chapter: Option<u32>,
    /// New phase.
    #[serde(default)]
    pub phase: Option<String>,
    /// New free-text ghost appearance.
    #[serde(default)]
    pub persona_description: Option<String>,
}

/// Request body for POST /{id}/hints.
#[derive(Debug, Deserialize)]
pub struct UnlockHintRequest {
    /// Zero-based hint index.
    pub hint_index: u32,
}

/// Request body for POST /{id}/answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The player's answer.
    pub answer_text: String,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::CreateGame {
        correlation_id: Uuid::new_v4(),
        player_name: request.player_name,
        mode: request.mode,
        persona: request.persona_description.map(Persona::Description),
    };

    info!(correlation_id = %command.correlation_id, "handling create_game command");

    let game = command_handlers::handle_create_game(
        &command,
        state.default_mode,
        state.clock.as_ref(),
        state.games.as_ref(),
    )
    .await?;

    Ok(Json(GameView::new(game, &state.scenario)))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let view =
        query_handlers::get_game_by_id(game_id, state.games.as_ref(), &state.scenario).await?;
    Ok(Json(view))
}

/// PATCH /{id}
#[instrument(skip(state, request))]
async fn patch_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<PatchGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::PatchGame {
        correlation_id: Uuid::new_v4(),
        game_id,
        patch: GamePatch {
            status: request.status,
            current_chapter: request.current_chapter,
            phase: request.phase,
            persona: request.persona_description.map(Persona::Description),
            clear_unlocked_hints: false,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling patch_game command");

    let game = command_handlers::handle_patch_game(
        &command,
        state.clock.as_ref(),
        state.games.as_ref(),
        &state.scenario,
    )
    .await?;

    Ok(Json(GameView::new(game, &state.scenario)))
}

/// POST /{id}/hints
#[instrument(skip(state, request))]
async fn unlock_hint(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<UnlockHintRequest>,
) -> Result<Json<HintUnlocked>, ApiError> {
    let command = commands::UnlockHint {
        correlation_id: Uuid::new_v4(),
        game_id,
        hint_index: request.hint_index,
    };

    info!(correlation_id = %command.correlation_id, "handling unlock_hint command");

    let unlocked = command_handlers::handle_unlock_hint(
        &command,
        state.clock.as_ref(),
        state.games.as_ref(),
        &state.scenario,
    )
    .await?;

    Ok(Json(unlocked))
}

/// POST /{id}/answer
#[instrument(skip(state, request))]
async fn submit_answer(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerResult>, ApiError> {
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        game_id,
        answer: request.answer_text,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let result = command_handlers::handle_submit_answer(
        &command,
        state.clock.as_ref(),
        state.games.as_ref(),
        &state.scenario,
    )
    .await?;

    Ok(Json(result))
}

/// Returns the router for the game lifecycle.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{id}", get(get_game).patch(patch_game))
        .route("/{id}/hints", post(unlock_hint))
        .route("/{id}/answer", post(submit_answer))
}
