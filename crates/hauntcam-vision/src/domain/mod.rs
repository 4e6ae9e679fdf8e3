//! Vision domain types.

pub mod detection;
pub mod gesture;
pub mod verification;
