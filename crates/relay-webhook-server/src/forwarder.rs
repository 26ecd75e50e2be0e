// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dispatch forwarding to the downstream publish handler
//!
//! The forward is synchronous from the relay's point of view: it either
//! returns success (the handler accepted the request into its own workflow
//! system) or an error. There is no internal retry; the event source has
//! its own redelivery policy, and retrying here on top of it would risk
//! duplicate dispatches. No idempotency key is attached; the downstream
//! handler is an idempotent sink keyed by (repository, commit, package path).

use async_trait::async_trait;
use relay_api_contract::{DispatchEnvelope, DispatchRequest};
use reqwest::Client as HttpClient;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Forward result type
pub type ForwardResult = Result<(), ForwardError>;

/// Errors surfaced by a dispatch forward
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dispatch target returned status {status}: {body}")]
    Rejected { status: reqwest::StatusCode, body: String },
}

/// Trigger interface of the downstream publish handler, injected into the
/// app state so tests can record forwards without network I/O
#[async_trait]
pub trait DispatchForwarder: Send + Sync {
    /// Hand off one qualifying event. Called at most once per inbound event.
    async fn forward(&self, request: &DispatchRequest) -> ForwardResult;
}

/// Production forwarder: POST `{event_type, client_payload}` to the trigger
/// endpoint with a bearer credential
pub struct HttpDispatchForwarder {
    http_client: HttpClient,
    dispatch_url: Url,
    token: String,
}

impl HttpDispatchForwarder {
    pub fn new(dispatch_url: Url, token: String, timeout: Duration) -> Result<Self, ForwardError> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("relay-webhook-server/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            dispatch_url,
            token,
        })
    }
}

#[async_trait]
impl DispatchForwarder for HttpDispatchForwarder {
    async fn forward(&self, request: &DispatchRequest) -> ForwardResult {
        let envelope = DispatchEnvelope::new(request.clone());

        let response = self
            .http_client
            .post(self.dispatch_url.clone())
            .bearer_auth(&self.token)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::Rejected { status, body });
        }

        Ok(())
    }
}
