use std::sync::Arc;

use armis_core::store::LatestReadingStore;
use armis_events::AlertDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including the risk policy and field aliases.
    pub config: Arc<ServerConfig>,
    /// The most recent reading uploaded by the field device.
    pub store: Arc<LatestReadingStore>,
    /// Sends alerts to the configured notifiers.
    pub dispatcher: AlertDispatcher,
}

impl AppState {
    pub fn new(config: ServerConfig, dispatcher: AlertDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(LatestReadingStore::new()),
            dispatcher,
        }
    }
}
