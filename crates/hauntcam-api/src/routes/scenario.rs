//! Read-only routes over the scenario content.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use hauntcam_scenario::application::query_handlers::{self, ChapterView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /chapters
async fn list_chapters(State(state): State<AppState>) -> Json<Vec<ChapterView>> {
    Json(query_handlers::list_chapters(&state.scenario))
}

/// GET /chapters/{number}
async fn get_chapter(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<ChapterView>, ApiError> {
    Ok(Json(query_handlers::get_chapter(&state.scenario, number)?))
}

/// Returns the router for scenario content.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chapters", get(list_chapters))
        .route("/chapters/{number}", get(get_chapter))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::testing::{TestApp, send_json};

    use super::router;

    #[tokio::test]
    async fn test_chapters_are_listed_in_order_with_rendered_story() {
        // Arrange
        let app = TestApp::new();

        // Act
        let (status, json) =
            send_json(router().with_state(app.state()), "GET", "/chapters", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let chapters = json.as_array().unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0]["chapter"], 1);
        assert_eq!(chapters[1]["chapter"], 2);
        assert!(
            chapters[0]["story_html"]
                .as_str()
                .unwrap()
                .contains("<em>cold</em>")
        );
    }

    #[tokio::test]
    async fn test_unknown_chapter_is_404() {
        let app = TestApp::new();
        let (status, json) =
            send_json(router().with_state(app.state()), "GET", "/chapters/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }
}
