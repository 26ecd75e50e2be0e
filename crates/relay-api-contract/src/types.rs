// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Contract types for the publish-relay webhook service

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Event type string sent with every downstream dispatch
pub const PUBLISH_EVENT_TYPE: &str = "publish-package";

/// Inbound push event, deserialized from the raw signed request body.
///
/// Only the fields the relay actually routes on are declared; everything
/// else in the source payload is ignored at the serde boundary. The delivery
/// id and event kind travel as HTTP headers, not body fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub repository: EventRepository,
    /// Head commit id after the push
    pub after: String,
    /// Fully qualified git ref, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub pusher: Pusher,
    /// Absent for pushes with no commits (e.g. branch deletion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_commit: Option<HeadCommit>,
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

/// Repository block of the inbound event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRepository {
    /// `owner/name`, the join key against the registry
    pub full_name: String,
}

/// Identity that performed the push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pusher {
    pub name: String,
}

/// Head commit metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadCommit {
    pub message: String,
}

/// One commit carried in the push event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushCommit {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

impl PushEvent {
    /// Union of added, modified, and removed paths across every commit.
    ///
    /// An event with zero commits yields an empty set.
    pub fn changed_paths(&self) -> BTreeSet<&str> {
        self.commits
            .iter()
            .flat_map(|commit| {
                commit
                    .added
                    .iter()
                    .chain(commit.modified.iter())
                    .chain(commit.removed.iter())
            })
            .map(String::as_str)
            .collect()
    }

    /// Head commit message, empty when the event carries none
    pub fn head_message(&self) -> &str {
        self.head_commit.as_ref().map(|c| c.message.as_str()).unwrap_or_default()
    }
}

/// Participation state of a registry entry.
///
/// Unknown status strings on the wire are a deserialization error; the
/// registry document is rejected as malformed rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryStatus {
    Active,
    Pending,
    Disabled,
}

/// One row of the repository registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Canonical `https://<host>/<owner>/<name>`, matched by exact string
    /// equality (case-sensitive, no trailing slash)
    pub url: String,
    pub status: RegistryStatus,
}

/// Snapshot of the external repository registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub repositories: Vec<RegistryEntry>,
}

/// Normalized payload forwarded to the downstream publish handler.
///
/// Constructed only after signature verification succeeded and the source
/// repository resolved to an active registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DispatchRequest {
    /// `owner/name` of the source repository
    #[validate(length(min = 1))]
    pub repository: String,
    #[validate(length(min = 1))]
    pub commit_id: String,
    pub commit_message: String,
    pub commit_author: String,
    pub branch: String,
    /// Empty string signals "auto-detect all changed packages downstream"
    pub package_path_hint: String,
}

/// Envelope posted to the downstream trigger endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchEnvelope {
    pub event_type: String,
    pub client_payload: DispatchRequest,
}

impl DispatchEnvelope {
    pub fn new(payload: DispatchRequest) -> Self {
        Self {
            event_type: PUBLISH_EVENT_TYPE.to_string(),
            client_payload: payload,
        }
    }
}

/// `{message, ...context}` body returned for every 200 outcome, no-op or
/// dispatched, so the event source never retries a filtering decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WebhookResponse {
    /// No-op outcome with no further context
    pub fn ignored(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// No-op outcome naming the repository and the reason it was skipped
    pub fn skipped(
        message: impl Into<String>,
        repository: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            repository: Some(repository.into()),
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Successful dispatch outcome
    pub fn dispatched(repository: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            message: "dispatch forwarded".to_string(),
            repository: Some(repository.into()),
            commit: Some(commit.into()),
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> serde_json::Value {
        serde_json::json!({
            "ref": "refs/heads/main",
            "after": "f88f7bd4250b963752d615e491b7e676ce5eb7f0",
            "repository": { "full_name": "acme/widgets", "private": true },
            "pusher": { "name": "octocat", "email": "octocat@example.com" },
            "head_commit": { "id": "f88f7bd", "message": "bump version to 1.2.3" },
            "commits": [
                { "added": ["Assets/Core/package.json"], "modified": [], "removed": [] },
                { "added": [], "modified": ["README.md"], "removed": ["old/file.txt"] }
            ]
        })
    }

    #[test]
    fn push_event_deserializes_from_source_shape() {
        let event: PushEvent = serde_json::from_value(sample_event()).unwrap();
        assert_eq!(event.repository.full_name, "acme/widgets");
        assert_eq!(event.ref_name, "refs/heads/main");
        assert_eq!(event.pusher.name, "octocat");
        assert_eq!(event.head_message(), "bump version to 1.2.3");
    }

    #[test]
    fn changed_paths_is_the_union_across_commits() {
        let event: PushEvent = serde_json::from_value(sample_event()).unwrap();
        let paths = event.changed_paths();
        assert_eq!(paths.len(), 3);
        assert!(paths.contains("Assets/Core/package.json"));
        assert!(paths.contains("README.md"));
        assert!(paths.contains("old/file.txt"));
    }

    #[test]
    fn zero_commit_event_has_empty_union() {
        let event: PushEvent = serde_json::from_value(serde_json::json!({
            "ref": "refs/heads/gone",
            "after": "0000000000000000000000000000000000000000",
            "repository": { "full_name": "acme/widgets" },
            "pusher": { "name": "octocat" }
        }))
        .unwrap();
        assert!(event.commits.is_empty());
        assert!(event.changed_paths().is_empty());
    }

    #[test]
    fn registry_document_rejects_unknown_status() {
        let doc = serde_json::json!({
            "repositories": [ { "url": "https://github.com/acme/widgets", "status": "archived" } ]
        });
        assert!(serde_json::from_value::<RegistryDocument>(doc).is_err());
    }

    #[test]
    fn registry_status_round_trips_lowercase() {
        let doc: RegistryDocument = serde_json::from_str(
            r#"{ "repositories": [ { "url": "https://github.com/acme/widgets", "status": "pending" } ] }"#,
        )
        .unwrap();
        assert_eq!(doc.repositories[0].status, RegistryStatus::Pending);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""status":"pending""#));
    }

    #[test]
    fn dispatch_envelope_carries_fixed_event_type() {
        let envelope = DispatchEnvelope::new(DispatchRequest {
            repository: "acme/widgets".into(),
            commit_id: "f88f7bd".into(),
            commit_message: "bump".into(),
            commit_author: "octocat".into(),
            branch: "refs/heads/main".into(),
            package_path_hint: String::new(),
        });
        assert_eq!(envelope.event_type, PUBLISH_EVENT_TYPE);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["client_payload"]["package_path_hint"], "");
    }

    #[test]
    fn webhook_response_omits_empty_context() {
        let body = serde_json::to_value(WebhookResponse::ignored("event ignored")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "event ignored" }));
    }
}
