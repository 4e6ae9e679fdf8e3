//! Hauntcam — Play.
//!
//! Orchestrates the flows that combine game state with the generative
//! service: the photo turn, the final accusation, persona avatar generation,
//! and overlay regeneration for a stored photo.

pub mod application;
pub mod domain;
