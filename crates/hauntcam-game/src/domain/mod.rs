//! Game domain: commands and transition rules.

pub mod commands;
pub mod state_machine;
