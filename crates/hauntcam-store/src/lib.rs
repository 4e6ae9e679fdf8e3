//! Storage adapters for the Hauntcam game engine: `PostgreSQL` repositories
//! and a filesystem blob store.

pub mod fs_blob_store;
pub mod pg_game_repository;
pub mod pg_photo_repository;
pub mod schema;

pub use fs_blob_store::FsBlobStore;
pub use pg_game_repository::PgGameRepository;
pub use pg_photo_repository::PgPhotoRepository;
