//! Shared runtime state for the RPC frontend: a small `Clone`-able struct
//! handlers pull out of Axum's `State` extractor. No broadcast bus here —
//! the frontend has no SSE surface.

use std::sync::Arc;

use rsch_remote::RedditCapability;
use rsch_store::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub remote: Arc<dyn RedditCapability>,
}

impl AppState {
    pub fn new(store: StoreHandle, remote: Arc<dyn RedditCapability>) -> Self {
        Self { store, remote }
    }
}
