//! Routes for play: photo turns, accusations, avatars, and photos.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::ImageData;
use hauntcam_game::application::query_handlers::GameView;
use hauntcam_play::application::{
    accusation_judge, avatar, overlay, query_handlers, turn_processor,
};
use hauntcam_play::domain::commands;
use hauntcam_play::domain::outcome::{AccusationVerdict, PhotoView, TurnOutcome};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Largest accepted photo upload.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const PHOTO_FIELD: &str = "file";

/// Request body for POST /{id}/accusation.
#[derive(Debug, Deserialize)]
pub struct AccusationRequest {
    /// Named suspect.
    pub suspect: String,
    /// The player's reasoning.
    #[serde(default)]
    pub reason: String,
}

/// Request body for POST /{id}/avatar.
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// Appearance to draw.
    pub description: String,
}

/// Pulls the photo out of the `file` field of a multipart body.
async fn read_photo(mut multipart: Multipart) -> Result<ImageData, DomainError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        DomainError::Validation(format!("invalid multipart body: {e}"))
    };
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let mime_type = field.content_type().unwrap_or("image/jpeg").to_owned();
        if !mime_type.starts_with("image/") {
            return Err(DomainError::Validation(format!(
                "uploaded file must be an image, got {mime_type}"
            )));
        }
        let bytes = field.bytes().await.map_err(invalid)?;
        return Ok(ImageData::new(bytes.to_vec(), mime_type));
    }
    Err(DomainError::Validation(format!(
        "multipart field `{PHOTO_FIELD}` is required"
    )))
}

/// POST /{id}/turn
#[instrument(skip(state, multipart))]
async fn play_turn(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<TurnOutcome>, ApiError> {
    let command = commands::PlayTurn {
        correlation_id: Uuid::new_v4(),
        game_id,
        photo: read_photo(multipart).await?,
    };

    info!(
        correlation_id = %command.correlation_id,
        size = command.photo.bytes.len(),
        "handling play_turn command"
    );

    let outcome = turn_processor::handle_play_turn(&command, &state.play_services()).await?;
    Ok(Json(outcome))
}

/// POST /{id}/accusation
#[instrument(skip(state, request))]
async fn submit_accusation(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<AccusationRequest>,
) -> Result<Json<AccusationVerdict>, ApiError> {
    let command = commands::SubmitAccusation {
        correlation_id: Uuid::new_v4(),
        game_id,
        suspect: request.suspect,
        reasoning: request.reason,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_accusation command");

    let verdict =
        accusation_judge::handle_accusation(&command, &state.play_services()).await?;
    Ok(Json(verdict))
}

/// POST /{id}/avatar
#[instrument(skip(state, request))]
async fn generate_avatar(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<AvatarRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::GenerateAvatar {
        correlation_id: Uuid::new_v4(),
        game_id,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling generate_avatar command");

    let game = avatar::handle_generate_avatar(&command, &state.play_services()).await?;
    Ok(Json(GameView::new(game, &state.scenario)))
}

/// GET /{id}/photos
#[instrument(skip(state))]
async fn list_photos(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Vec<PhotoView>>, ApiError> {
    let photos =
        query_handlers::list_photos(game_id, state.games.as_ref(), state.photos.as_ref()).await?;
    Ok(Json(photos))
}

/// GET /{id}/photos/{photo_id}
#[instrument(skip(state))]
async fn get_photo(
    State(state): State<AppState>,
    Path((game_id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PhotoView>, ApiError> {
    let photo = query_handlers::get_photo(game_id, photo_id, state.photos.as_ref()).await?;
    Ok(Json(photo))
}

/// POST /{id}/photos/{photo_id}/ghost
#[instrument(skip(state))]
async fn regenerate_overlay(
    State(state): State<AppState>,
    Path((game_id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PhotoView>, ApiError> {
    let command = commands::RegenerateOverlay {
        correlation_id: Uuid::new_v4(),
        game_id,
        photo_id,
    };

    info!(correlation_id = %command.correlation_id, "handling regenerate_overlay command");

    let photo = overlay::handle_regenerate_overlay(&command, &state.play_services()).await?;
    Ok(Json(photo))
}

/// Returns the router for play, nested under the games prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/turn",
            post(play_turn).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/{id}/accusation", post(submit_accusation))
        .route("/{id}/avatar", post(generate_avatar))
        .route("/{id}/photos", get(list_photos))
        .route("/{id}/photos/{photo_id}", get(get_photo))
        .route("/{id}/photos/{photo_id}/ghost", post(regenerate_overlay))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hauntcam_core::model::GameMode;
    use serde_json::json;

    use crate::routes::testing::{TestApp, multipart_body, read_json, send_json};

    use super::router;

    fn turn_request(game_id: uuid::Uuid, field: &str, content_type: &str) -> Request<Body> {
        let (boundary, body) = multipart_body(field, content_type, &[0xff, 0xd8, 0xff]);
        Request::builder()
            .method("POST")
            .uri(format!("/{game_id}/turn"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_turn_clears_detected_item_and_returns_overlay() {
        // Arrange
        let app = TestApp::new();
        let game_id = app.game(GameMode::ItemCatalog).await;
        app.script_detection("cup", "high");
        app.script_overlay();

        // Act
        let (status, json) = read_json(
            router().with_state(app.state()),
            turn_request(game_id, "file", "image/jpeg"),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["detected_item"], "cup");
        assert_eq!(json["cleared_items"], json!(["cup"]));
        assert_eq!(json["remaining_items"], json!(["clock"]));
        assert_eq!(json["status"], "playing");
        assert!(json["overlay_url"].as_str().unwrap().ends_with("/001_ghost.png"));
    }

    #[tokio::test]
    async fn test_turn_without_file_field_is_400() {
        let app = TestApp::new();
        let game_id = app.game(GameMode::ItemCatalog).await;
        let (status, json) = read_json(
            router().with_state(app.state()),
            turn_request(game_id, "photo", "image/jpeg"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(app.client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_turn_with_non_image_is_400() {
        let app = TestApp::new();
        let game_id = app.game(GameMode::ItemCatalog).await;
        let (status, _) = read_json(
            router().with_state(app.state()),
            turn_request(game_id, "file", "text/plain"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_accusation_before_everything_is_found_is_409() {
        // Arrange
        let app = TestApp::new();
        let game_id = app.game(GameMode::ItemCatalog).await;

        // Act
        let (status, json) = send_json(
            router().with_state(app.state()),
            "POST",
            &format!("/{game_id}/accusation"),
            Some(json!({ "suspect": "Butler", "reason": "The tea." })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "invalid_state");
        assert_eq!(app.client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_avatar_without_image_is_502() {
        // Arrange
        let app = TestApp::new();
        let game_id = app.game(GameMode::ItemCatalog).await;
        app.script_text("I cannot draw that.");

        // Act
        let (status, json) = send_json(
            router().with_state(app.state()),
            "POST",
            &format!("/{game_id}/avatar"),
            Some(json!({ "description": "an old butler" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "upstream_generation_failure");
    }

    #[tokio::test]
    async fn test_photos_of_unknown_game_is_404() {
        let app = TestApp::new();
        let (status, _) = send_json(
            router().with_state(app.state()),
            "GET",
            &format!("/{}/photos", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
