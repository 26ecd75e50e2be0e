// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository registry access for the publish relay
//!
//! The registry is an external JSON document listing the repositories that
//! participate in automated publishing and their enabled/disabled state. The
//! relay reads a fresh snapshot per inbound request and never caches across
//! requests, so staleness is bounded by the last successful fetch.
//!
//! Fetching is behind the [`RegistrySource`] trait so the server wires in
//! the HTTP client in production and a fixed snapshot in tests, without any
//! ambient global registry state.

pub mod client;
pub mod error;
pub mod resolve;

pub use client::RegistryClient;
pub use error::{RegistryClientError, RegistryClientResult};
pub use resolve::{RegistryDecision, normalize_repository_url, resolve};

use async_trait::async_trait;
use relay_api_contract::RegistryDocument;

/// Read-through source of registry snapshots
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch the current registry snapshot.
    ///
    /// Implementations must not cache across calls; every invocation
    /// observes the registry as it is now.
    async fn fetch_snapshot(&self) -> RegistryClientResult<RegistryDocument>;
}
