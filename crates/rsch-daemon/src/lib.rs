//! The Frontend component: an Axum router translating four
//! RPC operations into Store commands, plus the shared state the handlers
//! close over. `main.rs` is Bootstrap; it is the only part of
//! this crate not re-exported for tests.

pub mod routes;
pub mod state;

pub use state::AppState;
