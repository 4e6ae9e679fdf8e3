//! Play domain: commands, results, and player-facing messages.

pub mod commands;
pub mod messages;
pub mod outcome;
