//! Blob references: signed URLs and the blob download route.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use hauntcam_core::blob::mime_for_path;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Lifetime of a signed reference.
pub const SIGNED_URL_TTL_SECS: i64 = 3600;

/// Response body for GET /url/{*path}.
#[derive(Debug, Serialize)]
pub struct SignedUrlResponse {
    /// Time-limited reference.
    pub url: String,
    /// When the reference stops working.
    pub expires_at: DateTime<Utc>,
}

/// Query of a signed blob reference.
#[derive(Debug, Deserialize)]
pub struct SignatureQuery {
    /// Expiry as a Unix timestamp.
    pub expires: Option<i64>,
    /// Reference signature.
    pub signature: Option<String>,
}

/// GET /url/{*path}
#[instrument(skip(state))]
async fn signed_url(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<SignedUrlResponse>, ApiError> {
    let now = state.clock.now();
    let ttl = Duration::seconds(SIGNED_URL_TTL_SECS);
    let url = state.blobs.signed_url(&path, ttl, now)?;
    Ok(Json(SignedUrlResponse {
        url,
        expires_at: now + ttl,
    }))
}

/// GET /blobs/{*path}
///
/// A reference carrying `expires` and `signature` is checked before the
/// bytes are served.
#[instrument(skip(state, query))]
async fn download_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignatureQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) {
        state
            .blobs
            .verify_signed_url(&path, expires, signature, state.clock.now())?;
    }
    let bytes = state.blobs.get(&path).await?;
    Ok(([(header::CONTENT_TYPE, mime_for_path(&path))], bytes))
}

/// Returns the router for signed references, nested under the API prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/url/{*path}", get(signed_url))
}

/// Returns the router serving stored blobs.
pub fn blob_router() -> Router<AppState> {
    Router::new().route("/blobs/{*path}", get(download_blob))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hauntcam_core::blob::BlobStore;
    use hauntcam_test_support::TEST_SIGNATURE;
    use tower::ServiceExt;

    use crate::routes::testing::{TestApp, send_json};

    use super::{blob_router, router};

    #[tokio::test]
    async fn test_signed_url_expires_in_one_hour() {
        // Arrange
        let app = TestApp::new();

        // Act
        let (status, json) = send_json(
            router().with_state(app.state()),
            "GET",
            "/url/games/g/avatar.png",
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let expires = app.clock.0.timestamp() + 3600;
        assert_eq!(
            json["url"],
            format!(
                "https://blobs.test/games/g/avatar.png?expires={expires}&signature={TEST_SIGNATURE}"
            )
        );
    }

    #[tokio::test]
    async fn test_blob_is_served_with_its_content_type() {
        // Arrange
        let app = TestApp::new();
        app.blobs
            .put("games/g/avatar.png", vec![0x89, 0x50], "image/png")
            .await
            .unwrap();
        let request = Request::builder()
            .uri("/blobs/games/g/avatar.png")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = blob_router()
            .with_state(app.state())
            .oneshot(request)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/png");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.to_vec(), vec![0x89, 0x50]);
    }

    #[tokio::test]
    async fn test_bad_signature_is_rejected() {
        // Arrange
        let app = TestApp::new();
        app.blobs
            .put("games/g/avatar.png", vec![1], "image/png")
            .await
            .unwrap();
        let expires = app.clock.0.timestamp() + 60;

        // Act
        let (status, _) = send_json(
            blob_router().with_state(app.state()),
            "GET",
            &format!("/blobs/games/g/avatar.png?expires={expires}&signature=forged"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
