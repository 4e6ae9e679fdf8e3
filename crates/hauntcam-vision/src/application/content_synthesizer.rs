//! Ghost compositing and portrait generation.

use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{
    ContentPart, GenerateRequest, GenerateResponse, GenerativeContentClient, ImageData,
    OutputConfig,
};
use tracing::debug;

use crate::domain::gesture::{GestureCue, PersonaSource};
use crate::prompts;

/// A composited overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedOverlay {
    /// The composited image.
    pub image: ImageData,
    /// Cue the ghost was drawn with.
    pub gesture: GestureCue,
    /// Text returned alongside the image, if any.
    pub message: Option<String>,
}

/// Composites ghosts into photos.
///
/// Callers decide whether a failure is fatal: the turn pipeline logs it and
/// moves on, the avatar and regeneration flows surface it.
pub struct ContentSynthesizer<'a> {
    client: &'a dyn GenerativeContentClient,
    model: &'a str,
}

fn image_from(response: GenerateResponse, what: &str) -> Result<(ImageData, Option<String>), DomainError> {
    let message = Some(response.text()).filter(|text| !text.trim().is_empty());
    let image = response
        .parts
        .into_iter()
        .rev()
        .find_map(|part| match part {
            ContentPart::Inline(data) => Some(data),
            ContentPart::Text(_) => None,
        })
        .ok_or_else(|| DomainError::UpstreamGeneration(format!("{what} returned no image data")))?;
    Ok((image, message))
}

impl<'a> ContentSynthesizer<'a> {
    /// Creates a synthesizer calling `model` through `client`.
    #[must_use]
    pub fn new(client: &'a dyn GenerativeContentClient, model: &'a str) -> Self {
        Self { client, model }
    }

    /// Composites a ghost into `base`.
    ///
    /// The reference image, when present, is sent before the photo.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpstreamGeneration` when no image comes back, or
    /// the client's error when the call fails.
    pub async fn synthesize(
        &self,
        base: &ImageData,
        persona: &PersonaSource,
        gesture: GestureCue,
        hint: Option<&str>,
    ) -> Result<SynthesizedOverlay, DomainError> {
        let mut parts = Vec::with_capacity(3);
        if let PersonaSource::Reference(reference) = persona {
            parts.push(ContentPart::Inline(reference.clone()));
        }
        parts.push(ContentPart::Inline(base.clone()));
        parts.push(ContentPart::Text(prompts::synthesis_prompt(persona, &gesture, hint)));

        let response = self
            .client
            .generate(GenerateRequest {
                model: self.model.to_owned(),
                parts,
                output: OutputConfig::TextAndImage,
            })
            .await?;
        let (image, message) = image_from(response, "ghost synthesis")?;
        debug!(
            gesture = gesture.as_str(),
            mime_type = %image.mime_type,
            bytes = image.bytes.len(),
            "ghost synthesized"
        );
        Ok(SynthesizedOverlay {
            image,
            gesture,
            message,
        })
    }

    /// Draws a persona portrait from a description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UpstreamGeneration` when no image comes back, or
    /// the client's error when the call fails.
    pub async fn portrait(&self, description: &str) -> Result<ImageData, DomainError> {
        let response = self
            .client
            .generate(GenerateRequest {
                model: self.model.to_owned(),
                parts: vec![ContentPart::Text(prompts::avatar_prompt(description))],
                output: OutputConfig::TextAndImage,
            })
            .await?;
        image_from(response, "portrait generation").map(|(image, _)| image)
    }
}
