//! HTTP client for `POST {base}/v1beta/models/{model}:generateContent`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{GenerateRequest, GenerateResponse, GenerativeContentClient};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST client with a per-call timeout.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Maps a transport error to `Upstream` without the request URL.
fn upstream(context: &str, e: reqwest::Error) -> DomainError {
    DomainError::Upstream(format!("{context}: {}", e.without_url()))
}

#[async_trait]
impl GenerativeContentClient for GeminiClient {
    #[instrument(skip_all, fields(model = %request.model, parts = request.parts.len()))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, DomainError> {
        let body = GenerateContentRequest::from(&request);
        let reply = self
            .http
            .post(self.endpoint(&request.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| upstream("generate request failed", e))?
            .error_for_status()
            .map_err(|e| upstream("generate returned an error status", e))?
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| upstream("could not decode generate reply", e))?;

        let response = reply.into_response()?;
        debug!(parts = response.parts.len(), "generate call completed");
        Ok(response)
    }
}
