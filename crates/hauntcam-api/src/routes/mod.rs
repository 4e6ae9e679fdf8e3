//! Route modules organized by concern.

pub mod games;
pub mod generation;
pub mod health;
pub mod play;
pub mod scenario;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
