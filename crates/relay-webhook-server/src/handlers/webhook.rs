// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Webhook ingestion endpoint
//!
//! One handler invocation per inbound delivery, stages as hard gates:
//! signature verification strictly precedes event-kind filtering, which
//! strictly precedes payload parsing and path filtering, which strictly
//! precedes registry lookup, which strictly precedes dispatch forwarding.
//! Every filtering decision returns 200 so the event source does not treat
//! it as a delivery failure and retry.

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use crate::{filter, signature};
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use relay_api_contract::validation::validate_dispatch_request;
use relay_api_contract::{DispatchRequest, PushEvent, WebhookResponse};
use relay_registry_client::{normalize_repository_url, resolve};
use tracing::{info, warn};

/// Signature header; accepts `sha256=<hex>` or bare hex
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
/// Event-kind classifier header
pub const EVENT_KIND_HEADER: &str = "x-github-event";
/// Opaque delivery identifier, logged for correlation only
pub const DELIVERY_ID_HEADER: &str = "x-github-delivery";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers.get(name).and_then(|value| value.to_str().ok()).unwrap_or("")
}

/// Receive one signed event from the source forge
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<WebhookResponse>> {
    let delivery_id = header_str(&headers, DELIVERY_ID_HEADER);

    // Gate 1: authenticity. Verification runs over the exact body bytes;
    // nothing else happens for a request that fails it.
    let presented = header_str(&headers, SIGNATURE_HEADER);
    if !signature::verify(&body, presented, &state.config.webhook_secret) {
        warn!(delivery_id = %delivery_id, "signature verification failed");
        return Err(ServerError::Unauthorized(
            "signature missing or does not match".to_string(),
        ));
    }

    // Gate 2: event kind, from the classifier header so non-push events
    // short-circuit before the body is even parsed.
    let event_kind = header_str(&headers, EVENT_KIND_HEADER);
    if !filter::is_push(event_kind) {
        info!(delivery_id = %delivery_id, event_kind = %event_kind, "ignoring non-push event");
        return Ok(Json(WebhookResponse::ignored(format!(
            "ignoring '{event_kind}' event"
        ))));
    }

    // Gate 3: payload shape.
    let event: PushEvent = serde_json::from_slice(&body)
        .map_err(|err| ServerError::MalformedPayload(err.to_string()))?;
    let repository = event.repository.full_name.clone();

    // Gate 4: package relevance.
    if !filter::has_manifest_change(event.changed_paths(), &state.config.manifest_basename) {
        info!(delivery_id = %delivery_id, repository = %repository, "no manifest changes in push");
        return Ok(Json(WebhookResponse::skipped(
            "no manifest changes",
            repository,
            "event touched no manifest file",
        )));
    }

    // Gate 5: registry membership, on a snapshot fetched fresh for this
    // request. Fetch failure is logged apart from a legitimate not-found
    // and fails the request; a dispatch never happens on unknown state.
    let snapshot = state.registry.fetch_snapshot().await.map_err(|err| {
        tracing::error!(delivery_id = %delivery_id, repository = %repository, error = %err, "registry fetch failed");
        ServerError::RegistryUnavailable(err.to_string())
    })?;
    let repository_url = normalize_repository_url(&state.config.registry_host, &repository);
    let decision = resolve(&snapshot, &repository_url);
    if !decision.authorizes() {
        info!(
            delivery_id = %delivery_id,
            repository = %repository,
            decision = decision.reason(),
            "repository not authorized for dispatch"
        );
        return Ok(Json(WebhookResponse::skipped(
            "repository not registered/active",
            repository,
            decision.reason(),
        )));
    }

    // Gate 6: forward, exactly once per inbound event.
    let request = DispatchRequest {
        repository: repository.clone(),
        commit_id: event.after.clone(),
        commit_message: event.head_message().to_string(),
        commit_author: event.pusher.name.clone(),
        branch: event.ref_name.clone(),
        // Auto-detect all changed packages downstream
        package_path_hint: String::new(),
    };
    validate_dispatch_request(&request).map_err(|err| {
        warn!(delivery_id = %delivery_id, repository = %repository, error = %err, "dispatch request failed validation");
        ServerError::MalformedPayload(format!("dispatch request invalid: {err}"))
    })?;
    state.forwarder.forward(&request).await.map_err(|err| {
        tracing::error!(delivery_id = %delivery_id, repository = %repository, error = %err, "dispatch forward failed");
        ServerError::DispatchFailed(err.to_string())
    })?;

    info!(
        delivery_id = %delivery_id,
        repository = %repository,
        commit = %request.commit_id,
        "dispatch forwarded"
    );
    Ok(Json(WebhookResponse::dispatched(repository, request.commit_id.clone())))
}
