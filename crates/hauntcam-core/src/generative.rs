//! Generative model service abstraction.
//!
//! One request carries an ordered list of input parts (inline binary data or
//! text) and an output configuration. The response is a list of parts of the
//! same shape. Classifier-style calls use [`OutputConfig::Structured`] to ask
//! for schema-constrained JSON text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Raw image bytes with their mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Mime type, e.g. `image/jpeg`.
    pub mime_type: String,
}

impl ImageData {
    /// Convenience constructor.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// One input or output part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Inline binary payload.
    Inline(ImageData),
    /// Text payload.
    Text(String),
}

/// What the caller wants back.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputConfig {
    /// Plain text.
    Text,
    /// Text and/or images.
    TextAndImage,
    /// JSON text conforming to the given schema.
    Structured {
        /// Response schema in the service's OpenAPI-subset dialect.
        schema: serde_json::Value,
    },
}

/// A single generate call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Model name.
    pub model: String,
    /// Ordered input parts.
    pub parts: Vec<ContentPart>,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Parts returned by a generate call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Output parts in service order.
    pub parts: Vec<ContentPart>,
}

impl GenerateResponse {
    /// Concatenation of all text parts; empty when there are none.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::Inline(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// The last inline image part, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.parts.iter().rev().find_map(|part| match part {
            ContentPart::Inline(data) => Some(data),
            ContentPart::Text(_) => None,
        })
    }
}

/// Client for the generative model service.
///
/// Implementations enforce their own per-call timeout.
#[async_trait]
pub trait GenerativeContentClient: Send + Sync {
    /// Runs one generate call.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, DomainError>;
}

/// Model names per call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Item detection.
    pub detector: String,
    /// Ghost overlay synthesis.
    pub synthesis: String,
    /// Spec verification of generated images.
    pub verifier: String,
    /// Accusation judging.
    pub judge: String,
    /// Free image generation (avatars, verified images).
    pub image: String,
    /// Plain text passthrough default.
    pub text: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            detector: "gemini-2.5-flash".to_owned(),
            synthesis: "gemini-3-pro-image-preview".to_owned(),
            verifier: "gemini-2.5-flash-lite".to_owned(),
            judge: "gemini-2.5-flash".to_owned(),
            image: "gemini-2.0-flash-exp-image-generation".to_owned(),
            text: "gemini-2.5-flash".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_text_parts_and_skips_images() {
        let response = GenerateResponse {
            parts: vec![
                ContentPart::Text("boo".to_owned()),
                ContentPart::Inline(ImageData::new(vec![1], "image/png")),
                ContentPart::Text("!".to_owned()),
            ],
        };
        assert_eq!(response.text(), "boo!");
        assert_eq!(response.image().unwrap().bytes, vec![1]);
    }

    #[test]
    fn test_response_without_image_returns_none() {
        let response = GenerateResponse {
            parts: vec![ContentPart::Text("only words".to_owned())],
        };
        assert!(response.image().is_none());
    }
}
