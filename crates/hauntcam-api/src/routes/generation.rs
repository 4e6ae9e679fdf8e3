//! Generic generation endpoints: spec-verified images and plain text.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{ContentPart, GenerateRequest, OutputConfig};
use hauntcam_vision::application::generate_verify::{self, DEFAULT_MAX_ATTEMPTS};
use hauntcam_vision::application::image_spec::{ImageGenerator, ImageSpecVerifier};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /verified-image.
#[derive(Debug, Deserialize)]
pub struct VerifiedImageRequest {
    /// Image prompt.
    pub prompt: String,
    /// Text the image must satisfy.
    pub spec: String,
    /// Attempt budget, `1..=10`.
    #[serde(default)]
    pub max_retries: Option<u32>,
}

/// Response body for POST /verified-image.
#[derive(Debug, Serialize)]
pub struct VerifiedImageResponse {
    /// The accepted image, or the last one generated.
    pub image_base64: String,
    /// Its mime type.
    pub mime_type: String,
    /// Generation calls made.
    pub attempts: u32,
    /// Whether the image passed verification.
    pub passed: bool,
}

/// Request body for POST /text.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Prompt text.
    pub prompt: String,
    /// Model override.
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body for POST /text.
#[derive(Debug, Serialize)]
pub struct TextResponse {
    /// Generated text.
    pub text: String,
}

fn require(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// POST /verified-image
#[instrument(skip(state, request))]
async fn verified_image(
    State(state): State<AppState>,
    Json(request): Json<VerifiedImageRequest>,
) -> Result<Json<VerifiedImageResponse>, ApiError> {
    require(&request.prompt, "prompt")?;
    require(&request.spec, "spec")?;
    let max_attempts = request.max_retries.unwrap_or(DEFAULT_MAX_ATTEMPTS);

    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, max_attempts, "handling verified_image request");

    let generator = ImageGenerator::new(state.generative.as_ref(), &state.models.image);
    let verifier = ImageSpecVerifier::new(state.generative.as_ref(), &state.models.verifier);
    let outcome = generate_verify::generate_verified(
        &generator,
        &verifier,
        &request.prompt,
        &request.spec,
        max_attempts,
    )
    .await?;

    info!(
        %correlation_id,
        attempts = outcome.attempts_used,
        passed = outcome.passed,
        "verified image generated"
    );
    Ok(Json(VerifiedImageResponse {
        image_base64: BASE64.encode(&outcome.artifact.bytes),
        mime_type: outcome.artifact.mime_type,
        attempts: outcome.attempts_used,
        passed: outcome.passed,
    }))
}

/// POST /text
#[instrument(skip(state, request))]
async fn generate_text(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    require(&request.prompt, "prompt")?;
    let model = request
        .model
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| state.models.text.clone());

    let response = state
        .generative
        .generate(GenerateRequest {
            model,
            parts: vec![ContentPart::Text(request.prompt)],
            output: OutputConfig::Text,
        })
        .await?;

    Ok(Json(TextResponse {
        text: response.text(),
    }))
}

/// Returns the router for the generation endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/verified-image", post(verified_image))
        .route("/text", post(generate_text))
}
