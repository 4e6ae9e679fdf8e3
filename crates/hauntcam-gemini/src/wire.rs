//! `generateContent` request and response bodies.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{
    ContentPart, GenerateRequest, GenerateResponse, ImageData, OutputConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl From<&GenerateRequest> for GenerateContentRequest {
    fn from(request: &GenerateRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => Part {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                ContentPart::Inline(data) => Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: data.mime_type.clone(),
                        data: BASE64.encode(&data.bytes),
                    }),
                },
            })
            .collect();

        let generation_config = match &request.output {
            OutputConfig::Text => GenerationConfig::default(),
            OutputConfig::TextAndImage => GenerationConfig {
                response_modalities: Some(vec!["TEXT", "IMAGE"]),
                ..GenerationConfig::default()
            },
            OutputConfig::Structured { schema } => GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(schema.clone()),
                ..GenerationConfig::default()
            },
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts,
            }],
            generation_config,
        }
    }
}

impl GenerateContentResponse {
    /// Converts the first candidate's parts; a reply without candidates is an
    /// empty response.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if inline data is not valid base64.
    pub fn into_response(self) -> Result<GenerateResponse, DomainError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(GenerateResponse::default());
        };
        let mut parts = Vec::with_capacity(candidate.content.parts.len());
        for part in candidate.content.parts {
            if let Some(inline) = part.inline_data {
                let bytes = BASE64
                    .decode(inline.data.as_bytes())
                    .map_err(|e| DomainError::Upstream(format!("invalid inline data: {e}")))?;
                parts.push(ContentPart::Inline(ImageData::new(bytes, inline.mime_type)));
            } else if let Some(text) = part.text {
                parts.push(ContentPart::Text(text));
            }
        }
        Ok(GenerateResponse { parts })
    }
}
