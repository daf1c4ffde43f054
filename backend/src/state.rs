//! Shared application state injected into every handler.
//!
//! `AppState` is built once in `main.rs` and registered with
//! `web::Data`, replacing any process-global database handle. Each actix
//! worker gets a clone; the clones share the same `Store` connection and the
//! same `Config`.

use crate::config::Config;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// The only path to the `cafes` and `insights` tables.
    pub store: Store,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
