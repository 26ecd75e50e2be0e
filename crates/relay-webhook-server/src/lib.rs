// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! publish-relay webhook server
//!
//! This crate implements the webhook ingestion and dispatch-routing service:
//! it validates inbound event authenticity, filters for package-manifest
//! changes, checks the external repository registry for eligibility, and
//! forwards a normalized dispatch request to the downstream publish handler.
//!
//! Within one request the stages are hard gates, in order: signature
//! verification, event-kind filtering, payload parsing, manifest-path
//! filtering, registry membership, dispatch forwarding. No stage starts
//! before the previous one has definitively passed.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod filter;
pub mod forwarder;
pub mod handlers;
pub mod mock_dependencies;
pub mod server;
pub mod signature;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
