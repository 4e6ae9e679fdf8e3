//! Hauntcam — Game progress.
//!
//! Owns the game lifecycle (`waiting → playing → solved`), chapter advance,
//! hint unlocking, and the cleared-item invariants. Transition rules live in
//! [`domain::state_machine`] as pure functions; the command handlers in
//! [`application`] apply them through the atomic repository operations.

pub mod application;
pub mod domain;
