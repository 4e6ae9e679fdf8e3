//! Shared test mocks and utilities for the Hauntcam game engine.

mod blob;
mod clock;
mod generative;
mod repository;

pub use blob::{InMemoryBlobStore, TEST_BLOB_BASE_URL, TEST_SIGNATURE};
pub use clock::FixedClock;
pub use generative::{ScriptedGenerativeClient, image_response, text_response};
pub use repository::{FailingGameRepository, InMemoryGameRepository, InMemoryPhotoRepository};
