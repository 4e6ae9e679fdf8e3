//! Services over the generative content client.

pub mod content_synthesizer;
pub mod generate_verify;
pub mod image_spec;
pub mod item_detector;
