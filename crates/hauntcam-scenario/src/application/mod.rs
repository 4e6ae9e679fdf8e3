//! Application layer: read-only queries over the scenario store.

pub mod query_handlers;
