//! Persona avatar generation.
//!
//! The portrait is the deliverable here, so a reply without image data is an
//! error rather than something to log and skip.

use hauntcam_core::blob::extension_for;
use hauntcam_core::command::Command;
use hauntcam_core::error::DomainError;
use hauntcam_core::model::{Game, GamePatch, Persona};
use hauntcam_game::domain::state_machine;
use hauntcam_vision::application::content_synthesizer::ContentSynthesizer;
use tracing::{info, instrument};

use crate::application::PlayServices;
use crate::domain::commands::GenerateAvatar;

/// Handles the `GenerateAvatar` command: draws a portrait, stores it, and
/// makes it the game's reference persona.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game,
/// `DomainError::InvalidState` for a solved game, `DomainError::Validation`
/// for a blank description, and `DomainError::UpstreamGeneration` when no
/// image comes back.
#[instrument(skip_all, fields(game_id = %command.game_id))]
pub async fn handle_generate_avatar(
    command: &GenerateAvatar,
    services: &PlayServices<'_>,
) -> Result<Game, DomainError> {
    let description = command.description.trim();
    if description.is_empty() {
        return Err(DomainError::Validation(
            "description must not be blank".to_owned(),
        ));
    }
    let game = services.games.get(command.game_id).await?;
    state_machine::ensure_not_solved(&game)?;

    let portrait = ContentSynthesizer::new(services.generative, &services.models.image)
        .portrait(description)
        .await?;
    let path = format!(
        "games/{}/avatar.{}",
        game.id,
        extension_for(&portrait.mime_type)
    );
    let stored = services
        .blobs
        .put(&path, portrait.bytes, &portrait.mime_type)
        .await?;

    let patch = GamePatch {
        persona: Some(Persona::Reference(stored.path)),
        ..GamePatch::default()
    };
    let game = services
        .games
        .update(game.id, &patch, services.clock.now())
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        avatar_url = %stored.public_url,
        "avatar generated"
    );
    Ok(game)
}
