// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! publish-relay webhook contract types and validation
//!
//! This crate defines the schema types for every JSON document that crosses
//! a process boundary in the relay: the inbound push event, the repository
//! registry snapshot, the outbound dispatch payload, and the response bodies
//! returned to the event source. These types are shared between the webhook
//! server, the registry client, and the test suites so that field names are
//! spelled exactly once.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
