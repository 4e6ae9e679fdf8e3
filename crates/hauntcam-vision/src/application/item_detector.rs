//! Item detection over a structured classifier call.

use std::collections::BTreeSet;

use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{
    ContentPart, GenerateRequest, GenerativeContentClient, ImageData, OutputConfig,
};
use tracing::{debug, warn};

use crate::domain::detection::{Candidate, Detection, RawDetection, detection_schema};
use crate::prompts;

/// Classifies which remaining item, if any, a photo shows.
pub struct ItemDetector<'a> {
    client: &'a dyn GenerativeContentClient,
    model: &'a str,
}

impl<'a> ItemDetector<'a> {
    /// Creates a detector calling `model` through `client`.
    #[must_use]
    pub fn new(client: &'a dyn GenerativeContentClient, model: &'a str) -> Self {
        Self { client, model }
    }

    /// Runs detection against `candidates` only.
    ///
    /// An empty candidate list returns "no detection" without calling the
    /// classifier. A reply that does not decode degrades to "no detection".
    ///
    /// # Errors
    ///
    /// Returns the client's error when the call itself fails.
    pub async fn detect(
        &self,
        image: &ImageData,
        candidates: &[Candidate],
    ) -> Result<Detection, DomainError> {
        if candidates.is_empty() {
            return Ok(Detection::none("no candidates"));
        }
        let remaining: BTreeSet<String> = candidates.iter().map(|c| c.key.clone()).collect();

        let request = GenerateRequest {
            model: self.model.to_owned(),
            parts: vec![
                ContentPart::Inline(image.clone()),
                ContentPart::Text(prompts::detection_prompt(candidates)),
            ],
            output: OutputConfig::Structured {
                schema: detection_schema(),
            },
        };
        let response = self.client.generate(request).await?;
        let text = response.text();

        let detection = match serde_json::from_str::<RawDetection>(text.trim()) {
            Ok(raw) => Detection::normalize(raw, &remaining),
            Err(e) => {
                warn!(error = %e, "failed to decode detection result");
                Detection::none("parse error")
            }
        };
        debug!(
            detected_item = ?detection.detected_item,
            confidence = ?detection.confidence,
            "item detection finished"
        );
        Ok(detection)
    }
}
