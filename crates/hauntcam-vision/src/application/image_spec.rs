//! Image generator and spec verifier for the generate-verify loop.

use async_trait::async_trait;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{
    ContentPart, GenerateRequest, GenerativeContentClient, ImageData, OutputConfig,
};

use crate::application::generate_verify::{ArtifactGenerator, ArtifactVerifier};
use crate::domain::verification::is_affirmative;
use crate::prompts;

/// Generates an image from a text prompt.
pub struct ImageGenerator<'a> {
    client: &'a dyn GenerativeContentClient,
    model: &'a str,
}

impl<'a> ImageGenerator<'a> {
    /// Creates a generator calling `model` through `client`.
    #[must_use]
    pub fn new(client: &'a dyn GenerativeContentClient, model: &'a str) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ArtifactGenerator for ImageGenerator<'_> {
    type Artifact = ImageData;

    async fn generate(&self, prompt: &str) -> Result<ImageData, DomainError> {
        let response = self
            .client
            .generate(GenerateRequest {
                model: self.model.to_owned(),
                parts: vec![ContentPart::Text(prompt.to_owned())],
                output: OutputConfig::TextAndImage,
            })
            .await?;
        response.image().cloned().ok_or_else(|| {
            DomainError::UpstreamGeneration("image generation returned no image data".to_owned())
        })
    }
}

/// Asks a classifier whether an image satisfies a text specification.
pub struct ImageSpecVerifier<'a> {
    client: &'a dyn GenerativeContentClient,
    model: &'a str,
}

impl<'a> ImageSpecVerifier<'a> {
    /// Creates a verifier calling `model` through `client`.
    #[must_use]
    pub fn new(client: &'a dyn GenerativeContentClient, model: &'a str) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ArtifactVerifier<ImageData> for ImageSpecVerifier<'_> {
    async fn verify(&self, artifact: &ImageData, spec: &str) -> Result<bool, DomainError> {
        let response = self
            .client
            .generate(GenerateRequest {
                model: self.model.to_owned(),
                parts: vec![
                    ContentPart::Inline(artifact.clone()),
                    ContentPart::Text(prompts::verification_prompt(spec)),
                ],
                output: OutputConfig::Text,
            })
            .await?;
        Ok(is_affirmative(&response.text()))
    }
}
