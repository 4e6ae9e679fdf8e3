//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every state-changing request against a game.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The game this command targets, if it targets an existing one.
    fn game_id(&self) -> Option<Uuid> {
        None
    }
}
