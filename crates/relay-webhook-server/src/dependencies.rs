// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the webhook server

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    forwarder::{DispatchForwarder, HttpDispatchForwarder},
    state::AppState,
};
use relay_registry_client::{RegistryClient, RegistrySource};
use std::sync::Arc;
use url::Url;

/// Default dependency builder: real HTTP collaborators for both outbound
/// calls, each with the timeout from the configuration
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let registry_url = Url::parse(&config.registry_url)
            .map_err(|err| ServerError::Internal(format!("invalid registry URL: {err}")))?;
        let dispatch_url = Url::parse(&config.dispatch_url)
            .map_err(|err| ServerError::Internal(format!("invalid dispatch URL: {err}")))?;

        let registry = RegistryClient::with_timeout(registry_url, config.registry_timeout)
            .map_err(|err| ServerError::Internal(format!("registry client: {err}")))?;
        let forwarder = HttpDispatchForwarder::new(
            dispatch_url,
            config.dispatch_token.clone(),
            config.dispatch_timeout,
        )
        .map_err(|err| ServerError::Internal(format!("dispatch forwarder: {err}")))?;

        let registry: Arc<dyn RegistrySource> = Arc::new(registry);
        let forwarder: Arc<dyn DispatchForwarder> = Arc::new(forwarder);

        let state = AppState {
            config,
            registry,
            forwarder,
        };

        Ok(Self { state })
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
