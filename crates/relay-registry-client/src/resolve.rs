// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Pure membership resolution over a registry snapshot

use relay_api_contract::{RegistryDocument, RegistryStatus};

/// Outcome of looking up a repository in a registry snapshot.
///
/// Only [`RegistryDecision::Active`] authorizes a dispatch. The other
/// variants all produce the same not-authorized no-op; the distinction is
/// surfaced in logs for operators, never in the dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryDecision {
    /// Registered and enabled for publishing
    Active,
    /// Registered but awaiting activation
    Pending,
    /// Registered but explicitly turned off
    Disabled,
    /// No entry matches the repository
    NotFound,
}

impl RegistryDecision {
    /// Whether this decision authorizes a dispatch
    pub fn authorizes(self) -> bool {
        matches!(self, RegistryDecision::Active)
    }

    /// Stable label used in logs and response bodies
    pub fn reason(self) -> &'static str {
        match self {
            RegistryDecision::Active => "active",
            RegistryDecision::Pending => "pending",
            RegistryDecision::Disabled => "disabled",
            RegistryDecision::NotFound => "not registered",
        }
    }
}

/// Normalize an `owner/name` full name into the canonical URL shape used by
/// registry entries. Matching against entries is exact string equality, not
/// fuzzy or case-insensitive.
pub fn normalize_repository_url(host: &str, full_name: &str) -> String {
    format!("https://{host}/{full_name}")
}

/// Look up a repository URL in a snapshot. Total over its inputs and free
/// of side effects beyond a duplicate-entry warning, so calling it twice
/// with identical inputs yields identical decisions.
pub fn resolve(snapshot: &RegistryDocument, repository_url: &str) -> RegistryDecision {
    let mut matches = snapshot.repositories.iter().filter(|entry| entry.url == repository_url);

    let Some(entry) = matches.next() else {
        return RegistryDecision::NotFound;
    };

    if matches.next().is_some() {
        // Duplicates are a data-integrity bug in the registry document;
        // first exact match wins.
        tracing::warn!(url = repository_url, "duplicate registry entries for repository");
    }

    match entry.status {
        RegistryStatus::Active => RegistryDecision::Active,
        RegistryStatus::Pending => RegistryDecision::Pending,
        RegistryStatus::Disabled => RegistryDecision::Disabled,
    }
}
