//! Scripted `GenerativeContentClient` that replays queued responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{
    ContentPart, GenerateRequest, GenerateResponse, GenerativeContentClient, ImageData,
};

/// A response made of a single text part.
#[must_use]
pub fn text_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        parts: vec![ContentPart::Text(text.to_owned())],
    }
}

/// A response made of an inline image followed by an optional text part.
#[must_use]
pub fn image_response(bytes: &[u8], mime_type: &str, text: Option<&str>) -> GenerateResponse {
    let mut parts = vec![ContentPart::Inline(ImageData::new(bytes.to_vec(), mime_type))];
    if let Some(text) = text {
        parts.push(ContentPart::Text(text.to_owned()));
    }
    GenerateResponse { parts }
}

/// A client that answers calls from a queue and records every request.
///
/// Once the queue is empty every further call fails with
/// `DomainError::Upstream`, which makes unexpected calls visible in tests.
#[derive(Debug, Default)]
pub struct ScriptedGenerativeClient {
    responses: Mutex<VecDeque<Result<GenerateResponse, DomainError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGenerativeClient {
    /// Creates a client that replays `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<Result<GenerateResponse, DomainError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Appends a response to the queue.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, response: Result<GenerateResponse, DomainError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Returns a snapshot of every request received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeContentClient for ScriptedGenerativeClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, DomainError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::Upstream("no scripted response left".into())))
    }
}
