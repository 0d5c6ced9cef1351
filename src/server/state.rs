//! Server application state shared across handlers

use crate::config::AppConfig;
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Shared state for the server. There is no mutable cross-request state:
/// the config is read-only and the reqwest client only shares its
/// connection pool.
#[derive(Clone)]
pub struct ServerAppState {
    /// Runtime configuration (credential, hosts, model)
    pub config: Arc<AppConfig>,

    /// Shared HTTP client for outbound calls
    pub http: reqwest::Client,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(config: AppConfig, shutdown_state: ShutdownState) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            shutdown_state,
        }
    }
}
