//! Hauntcam — Vision and generation.
//!
//! Wraps the generative content service for the three image-facing jobs of
//! the game: classifying which remaining item a photo shows, compositing a
//! ghost into a photo, and the generic generate-then-verify retry loop.

pub mod application;
pub mod domain;
pub mod prompts;
