// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Event relevance filtering
//!
//! Decides whether an authenticated event matters to the relay at all,
//! before spending a network round-trip on the registry. Both checks are
//! pure functions over their inputs.

/// The only event kind the relay processes
pub const PUSH_EVENT_KIND: &str = "push";

/// Whether the classifier header names a push event
pub fn is_push(event_kind: &str) -> bool {
    event_kind == PUSH_EVENT_KIND
}

/// Whether any changed path names the manifest file exactly.
///
/// A path matches iff its final `/`-separated component equals the manifest
/// basename. Substring and suffix lookalikes (`mypackage.json`,
/// `package.json.bak`) never match; nested paths (`sub/dir/package.json`)
/// do. An empty path set never matches, so a zero-commit push (e.g. a
/// branch deletion) correctly falls through to a no-op.
pub fn has_manifest_change<'a, I>(changed_paths: I, manifest_basename: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    changed_paths
        .into_iter()
        .any(|path| path.rsplit('/').next() == Some(manifest_basename))
}
