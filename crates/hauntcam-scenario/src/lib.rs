//! Hauntcam — Scenario content.
//!
//! Responsible for loading chapter Markdown, the item hint table, and the
//! suspect table once at start-up, hashing the content for versioning, and
//! answering keyed lookups for the rest of the process lifetime.

pub mod application;
pub mod domain;
pub mod loader;
pub mod store;

pub use store::ScenarioStore;
