// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end tests of the webhook pipeline through the production router,
//! with mock registry and forwarder collaborators.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use relay_api_contract::{RegistryDocument, RegistryEntry, RegistryStatus, WebhookResponse};
use relay_webhook_server::mock_dependencies::MockServerDependencies;
use relay_webhook_server::{ServerConfig, server::build_app, signature};
use tower::ServiceExt;

const SECRET: &str = "whsec_test_0123456789";

fn test_config() -> ServerConfig {
    ServerConfig {
        webhook_secret: SECRET.to_string(),
        ..Default::default()
    }
}

fn registered(status: RegistryStatus) -> RegistryDocument {
    RegistryDocument {
        repositories: vec![RegistryEntry {
            url: "https://github.com/acme/widgets".to_string(),
            status,
        }],
    }
}

fn push_body(changed: &[&str]) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "ref": "refs/heads/main",
        "after": "f88f7bd4250b963752d615e491b7e676ce5eb7f0",
        "repository": { "full_name": "acme/widgets" },
        "pusher": { "name": "octocat" },
        "head_commit": { "message": "bump version to 1.2.3" },
        "commits": [ { "added": [], "modified": changed, "removed": [] } ]
    }))
    .expect("body")
}

fn signed_request(event_kind: &str, body: Vec<u8>, secret: &str) -> Request<Body> {
    let sig = format!("sha256={}", signature::sign(&body, secret));
    Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event_kind)
        .header("x-github-delivery", "delivery-0001")
        .header("x-hub-signature-256", sig)
        .body(Body::from(body))
        .expect("request")
}

async fn response_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn active_repository_push_is_dispatched_once() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", push_body(&["Assets/Core/package.json"]), SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body: WebhookResponse =
        serde_json::from_value(response_body(response).await).expect("webhook response");
    assert_eq!(body.message, "dispatch forwarded");
    assert_eq!(body.repository.as_deref(), Some("acme/widgets"));

    let forwarded = forwarder.forwarded();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].repository, "acme/widgets");
    assert_eq!(forwarded[0].commit_id, "f88f7bd4250b963752d615e491b7e676ce5eb7f0");
    assert_eq!(forwarded[0].commit_author, "octocat");
    assert_eq!(forwarded[0].branch, "refs/heads/main");
    assert_eq!(forwarded[0].package_path_hint, "");
}

#[tokio::test]
async fn disabled_repository_is_skipped_with_200() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Disabled));
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", push_body(&["package.json"]), SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_body(response).await;
    assert_eq!(body["message"], "repository not registered/active");
    assert_eq!(body["reason"], "disabled");
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn pending_and_unregistered_repositories_are_skipped() {
    for (snapshot, reason) in [
        (registered(RegistryStatus::Pending), "pending"),
        (RegistryDocument::default(), "not registered"),
    ] {
        let deps = MockServerDependencies::with_snapshot(test_config(), snapshot);
        let forwarder = deps.forwarder();
        let app = build_app(deps.into_state());

        let request = signed_request("push", push_body(&["package.json"]), SECRET);
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body(response).await;
        assert_eq!(body["reason"], reason);
        assert!(forwarder.forwarded().is_empty());
    }
}

#[tokio::test]
async fn non_push_event_is_ignored_before_parsing() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let registry = deps.registry();
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    // Not a push payload at all; the kind gate must short-circuit before
    // the body shape matters.
    let body = br#"{"action":"opened","number":7}"#.to_vec();
    let request = signed_request("pull_request", body, SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_body(response).await;
    assert_eq!(body["message"], "ignoring 'pull_request' event");
    assert_eq!(registry.fetch_count(), 0);
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn wrong_secret_is_rejected_before_any_lookup() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let registry = deps.registry();
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", push_body(&["package.json"]), "a-different-secret");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Verify gate short-circuits: no registry fetch, no forward.
    assert_eq!(registry.fetch_count(), 0);
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let app = build_app(deps.into_state());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("x-github-event", "push")
        .body(Body::from(push_body(&["package.json"])))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lookalike_manifest_paths_are_not_relevant() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let registry = deps.registry();
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request(
        "push",
        push_body(&["packagejson", "package.json.txt"]),
        SECRET,
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_body(response).await;
    assert_eq!(body["message"], "no manifest changes");
    assert_eq!(registry.fetch_count(), 0);
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn zero_commit_push_is_a_noop() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let body = serde_json::to_vec(&serde_json::json!({
        "ref": "refs/heads/gone",
        "after": "0000000000000000000000000000000000000000",
        "repository": { "full_name": "acme/widgets" },
        "pusher": { "name": "octocat" },
        "commits": []
    }))
    .expect("body");
    let request = signed_request("push", body, SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn registry_unavailable_fails_the_request_without_dispatch() {
    let deps = MockServerDependencies::with_unavailable_registry(test_config());
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", push_body(&["package.json"]), SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_body(response).await;
    assert_eq!(body["title"], "Registry Unavailable");
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn rejected_forward_surfaces_upstream_status_and_body() {
    let deps = MockServerDependencies::with_failing_forwarder(
        test_config(),
        registered(RegistryStatus::Active),
    );
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", push_body(&["package.json"]), SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_body(response).await;
    assert_eq!(body["title"], "Dispatch Forward Failed");
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.contains("502"));
    assert!(detail.contains("workflow system rejected the dispatch"));

    // The forward was attempted exactly once; no internal retry.
    assert_eq!(forwarder.forwarded().len(), 1);
}

#[tokio::test]
async fn malformed_payload_is_a_hard_failure() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    let request = signed_request("push", b"{not json".to_vec(), SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_body(response).await;
    assert_eq!(body["title"], "Malformed Payload");
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn empty_commit_id_never_reaches_the_forwarder() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let forwarder = deps.forwarder();
    let app = build_app(deps.into_state());

    // Parses fine but produces an invalid dispatch request; the outbound
    // payload is validated before the forward is attempted.
    let body = serde_json::to_vec(&serde_json::json!({
        "ref": "refs/heads/main",
        "after": "",
        "repository": { "full_name": "acme/widgets" },
        "pusher": { "name": "octocat" },
        "commits": [ { "added": [], "modified": ["package.json"], "removed": [] } ]
    }))
    .expect("body");
    let request = signed_request("push", body, SECRET);
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_body(response).await;
    assert_eq!(body["title"], "Malformed Payload");
    assert!(forwarder.forwarded().is_empty());
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let app = build_app(deps.into_state());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/webhook")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let deps =
        MockServerDependencies::with_snapshot(test_config(), registered(RegistryStatus::Active));
    let app = build_app(deps.into_state());

    for path in ["/healthz", "/readyz", "/version"] {
        let request = Request::builder().uri(path).body(Body::empty()).expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}
