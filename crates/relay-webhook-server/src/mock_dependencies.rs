// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory collaborators for tests: a fixed (or unavailable) registry
//! snapshot and a recording dispatch forwarder, so the full request pipeline
//! can be exercised without network I/O.

use crate::{
    config::ServerConfig,
    forwarder::{DispatchForwarder, ForwardError, ForwardResult},
    state::AppState,
};
use async_trait::async_trait;
use relay_api_contract::{DispatchRequest, RegistryDocument};
use relay_registry_client::{RegistryClientError, RegistryClientResult, RegistrySource};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Registry source backed by a fixed snapshot, or simulating fetch failure
pub struct MockRegistry {
    snapshot: Option<RegistryDocument>,
    fetches: AtomicUsize,
}

impl MockRegistry {
    pub fn with_snapshot(snapshot: RegistryDocument) -> Self {
        Self {
            snapshot: Some(snapshot),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A registry whose every fetch fails, as if the external store were down
    pub fn unavailable() -> Self {
        Self {
            snapshot: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches observed, used to assert gate short-circuiting
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrySource for MockRegistry {
    async fn fetch_snapshot(&self) -> RegistryClientResult<RegistryDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.snapshot {
            Some(snapshot) => Ok(snapshot.clone()),
            None => Err(RegistryClientError::UnexpectedStatus {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "registry store offline".to_string(),
            }),
        }
    }
}

/// Forwarder that records every dispatch instead of calling out
pub struct RecordingForwarder {
    calls: Mutex<Vec<DispatchRequest>>,
    fail: bool,
}

impl RecordingForwarder {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A forwarder whose every call is rejected by the downstream handler
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Dispatches recorded so far
    pub fn forwarded(&self) -> Vec<DispatchRequest> {
        self.calls.lock().expect("forwarder mutex").clone()
    }
}

impl Default for RecordingForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DispatchForwarder for RecordingForwarder {
    async fn forward(&self, request: &DispatchRequest) -> ForwardResult {
        self.calls.lock().expect("forwarder mutex").push(request.clone());
        if self.fail {
            return Err(ForwardError::Rejected {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "workflow system rejected the dispatch".to_string(),
            });
        }
        Ok(())
    }
}

/// Dependency wiring for tests
pub struct MockServerDependencies {
    state: AppState,
    registry: Arc<MockRegistry>,
    forwarder: Arc<RecordingForwarder>,
}

impl MockServerDependencies {
    /// Wire a fixed registry snapshot and a recording forwarder
    pub fn with_snapshot(config: ServerConfig, snapshot: RegistryDocument) -> Self {
        Self::build(config, MockRegistry::with_snapshot(snapshot), RecordingForwarder::new())
    }

    /// Wire an unavailable registry
    pub fn with_unavailable_registry(config: ServerConfig) -> Self {
        Self::build(config, MockRegistry::unavailable(), RecordingForwarder::new())
    }

    /// Wire a fixed snapshot and a forwarder the downstream rejects
    pub fn with_failing_forwarder(config: ServerConfig, snapshot: RegistryDocument) -> Self {
        Self::build(
            config,
            MockRegistry::with_snapshot(snapshot),
            RecordingForwarder::failing(),
        )
    }

    fn build(config: ServerConfig, registry: MockRegistry, forwarder: RecordingForwarder) -> Self {
        let registry = Arc::new(registry);
        let forwarder = Arc::new(forwarder);
        let state = AppState {
            config,
            registry: registry.clone(),
            forwarder: forwarder.clone(),
        };
        Self {
            state,
            registry,
            forwarder,
        }
    }

    /// Handle to the mock registry for assertions
    pub fn registry(&self) -> Arc<MockRegistry> {
        self.registry.clone()
    }

    /// Handle to the recording forwarder for assertions
    pub fn forwarder(&self) -> Arc<RecordingForwarder> {
        self.forwarder.clone()
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
