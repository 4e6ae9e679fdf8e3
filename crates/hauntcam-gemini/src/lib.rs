//! Gemini REST client.
//!
//! Implements [`hauntcam_core::generative::GenerativeContentClient`] over the
//! `generateContent` endpoint.

pub mod client;
pub mod wire;

pub use client::GeminiClient;
