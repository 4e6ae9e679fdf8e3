//! Photo queries.

use hauntcam_core::error::DomainError;
use hauntcam_core::repository::{GameRepository, PhotoRepository};
use uuid::Uuid;

use crate::domain::outcome::PhotoView;

/// Lists a game's photos ordered by creation time.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist.
pub async fn list_photos(
    game_id: Uuid,
    games: &dyn GameRepository,
    photos: &dyn PhotoRepository,
) -> Result<Vec<PhotoView>, DomainError> {
    games.get(game_id).await?;
    let photos = photos.list_by_game(game_id).await?;
    Ok(photos.into_iter().map(PhotoView::from).collect())
}

/// Retrieves one photo of a game.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the photo does not exist or belongs to
/// another game.
pub async fn get_photo(
    game_id: Uuid,
    photo_id: Uuid,
    photos: &dyn PhotoRepository,
) -> Result<PhotoView, DomainError> {
    let photo = photos.get(photo_id).await?;
    if photo.game_id != game_id {
        return Err(DomainError::not_found("photo", photo_id));
    }
    Ok(PhotoView::from(photo))
}
