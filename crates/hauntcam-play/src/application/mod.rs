//! Application layer: play flows and photo queries.

pub mod accusation_judge;
pub mod avatar;
pub mod overlay;
pub mod query_handlers;
pub mod turn_processor;

#[cfg(test)]
pub(crate) mod testing;

use hauntcam_core::blob::{BlobStore, mime_for_path, photo_path};
use hauntcam_core::clock::Clock;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::{GenerativeContentClient, ImageData, ModelConfig};
use hauntcam_core::model::{DEFAULT_PERSONA_DESCRIPTION, Game, Persona, Photo, PhotoOverlay};
use hauntcam_core::repository::{GameRepository, PhotoRepository};
use hauntcam_scenario::ScenarioStore;
use hauntcam_vision::application::content_synthesizer::ContentSynthesizer;
use hauntcam_vision::domain::gesture::{GestureCue, PersonaSource};

/// Collaborators shared by the play flows.
#[derive(Clone, Copy)]
pub struct PlayServices<'a> {
    /// Time source.
    pub clock: &'a dyn Clock,
    /// Game persistence.
    pub games: &'a dyn GameRepository,
    /// Photo persistence.
    pub photos: &'a dyn PhotoRepository,
    /// Image storage.
    pub blobs: &'a dyn BlobStore,
    /// Generative service.
    pub generative: &'a dyn GenerativeContentClient,
    /// Scenario content.
    pub scenario: &'a ScenarioStore,
    /// Model per call site.
    pub models: &'a ModelConfig,
}

/// Loads the appearance source for a game's ghost.
///
/// # Errors
///
/// Returns the blob store's error when a reference image cannot be read.
pub(crate) async fn resolve_persona(
    game: &Game,
    blobs: &dyn BlobStore,
) -> Result<PersonaSource, DomainError> {
    match &game.persona {
        Some(Persona::Reference(path)) => {
            let bytes = blobs.get(path).await?;
            Ok(PersonaSource::Reference(ImageData::new(
                bytes,
                mime_for_path(path),
            )))
        }
        Some(Persona::Description(text)) => Ok(PersonaSource::Description(text.clone())),
        None => Ok(PersonaSource::Description(
            DEFAULT_PERSONA_DESCRIPTION.to_owned(),
        )),
    }
}

/// Synthesizes a ghost into `base`, stores it next to the photo, and records
/// it on the photo.
///
/// # Errors
///
/// Returns any error of the persona lookup, the synthesis call, the upload,
/// or the photo update. Nothing is recorded on the photo unless every step
/// succeeded.
pub(crate) async fn attach_overlay(
    services: &PlayServices<'_>,
    game: &Game,
    photo: &Photo,
    base: &ImageData,
    gesture: GestureCue,
    hint: Option<&str>,
) -> Result<Photo, DomainError> {
    let persona = resolve_persona(game, services.blobs).await?;
    let synthesizer = ContentSynthesizer::new(services.generative, &services.models.synthesis);
    let overlay = synthesizer.synthesize(base, &persona, gesture, hint).await?;

    let path = photo_path(game.id, photo.sequence, "ghost", &overlay.image.mime_type);
    let stored = services
        .blobs
        .put(&path, overlay.image.bytes, &overlay.image.mime_type)
        .await?;
    services
        .photos
        .set_overlay(
            photo.id,
            PhotoOverlay {
                path: stored.path,
                url: stored.public_url,
                gesture: overlay.gesture.as_str().to_owned(),
                message: overlay.message,
            },
        )
        .await
}
