//! Overlay regeneration for a stored photo.

use hauntcam_core::blob::mime_for_path;
use hauntcam_core::command::Command;
use hauntcam_core::error::DomainError;
use hauntcam_core::generative::ImageData;
use hauntcam_vision::domain::gesture::GestureCue;
use tracing::{info, instrument};

use crate::application::{PlayServices, attach_overlay};
use crate::domain::commands::RegenerateOverlay;
use crate::domain::outcome::PhotoView;

/// Handles the `RegenerateOverlay` command: composites an idle ghost into a
/// photo whose turn produced no overlay.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown game or a photo of another
/// game, `DomainError::InvalidState` when the photo already has an overlay,
/// and `DomainError::UpstreamGeneration` when no image comes back.
#[instrument(skip_all, fields(game_id = %command.game_id, photo_id = %command.photo_id))]
pub async fn handle_regenerate_overlay(
    command: &RegenerateOverlay,
    services: &PlayServices<'_>,
) -> Result<PhotoView, DomainError> {
    let game = services.games.get(command.game_id).await?;
    let photo = services.photos.get(command.photo_id).await?;
    if photo.game_id != game.id {
        return Err(DomainError::not_found("photo", command.photo_id));
    }
    if photo.overlay.is_some() {
        return Err(DomainError::InvalidState(format!(
            "photo {} already has an overlay",
            photo.id
        )));
    }

    let bytes = services.blobs.get(&photo.original_path).await?;
    let base = ImageData::new(bytes, mime_for_path(&photo.original_path));
    let photo = attach_overlay(
        services,
        &game,
        &photo,
        &base,
        GestureCue::Mourning,
        Some(services.scenario.no_detection_message()),
    )
    .await?;

    info!(correlation_id = %command.correlation_id(), "overlay regenerated");
    Ok(PhotoView::from(photo))
}
