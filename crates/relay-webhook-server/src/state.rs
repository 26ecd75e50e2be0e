//! Server state management

use crate::config::ServerConfig;
use crate::forwarder::DispatchForwarder;
use relay_registry_client::RegistrySource;
use std::sync::Arc;

/// Shared server state.
///
/// The relay itself is stateless between requests; everything here is
/// configuration plus injected collaborators, so concurrent handler
/// invocations have nothing to race on.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Read-through registry snapshot source
    pub registry: Arc<dyn RegistrySource>,

    /// Downstream publish handler trigger
    pub forwarder: Arc<dyn DispatchForwarder>,
}

impl AppState {
    /// Get configuration reference
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
