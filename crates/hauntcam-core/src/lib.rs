//! Hauntcam Core — shared domain abstractions.
//!
//! This crate defines the records, collaborator traits, and error taxonomy
//! that every other Hauntcam crate depends on. It contains no infrastructure
//! code: persistence, blob storage, and the generative model service are
//! reached exclusively through the traits declared here.

pub mod blob;
pub mod clock;
pub mod command;
pub mod error;
pub mod generative;
pub mod model;
pub mod repository;
