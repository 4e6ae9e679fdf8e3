//! Shared application state.

use std::sync::Arc;

use hauntcam_core::blob::BlobStore;
use hauntcam_core::clock::Clock;
use hauntcam_core::generative::{GenerativeContentClient, ModelConfig};
use hauntcam_core::model::GameMode;
use hauntcam_core::repository::{GameRepository, PhotoRepository};
use hauntcam_play::application::PlayServices;
use hauntcam_scenario::ScenarioStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Game persistence.
    pub games: Arc<dyn GameRepository>,
    /// Photo persistence.
    pub photos: Arc<dyn PhotoRepository>,
    /// Image storage.
    pub blobs: Arc<dyn BlobStore>,
    /// Generative service client.
    pub generative: Arc<dyn GenerativeContentClient>,
    /// Scenario content, loaded once at start-up.
    pub scenario: Arc<ScenarioStore>,
    /// Model per call site.
    pub models: Arc<ModelConfig>,
    /// Mode for games created without one.
    pub default_mode: GameMode,
}

impl AppState {
    /// Borrows the collaborators the play flows need.
    #[must_use]
    pub fn play_services(&self) -> PlayServices<'_> {
        PlayServices {
            clock: self.clock.as_ref(),
            games: self.games.as_ref(),
            photos: self.photos.as_ref(),
            blobs: self.blobs.as_ref(),
            generative: self.generative.as_ref(),
            scenario: &self.scenario,
            models: &self.models,
        }
    }
}
