// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! HTTP client for the external registry document

use crate::RegistrySource;
use crate::error::{RegistryClientError, RegistryClientResult};
use async_trait::async_trait;
use relay_api_contract::RegistryDocument;
use reqwest::Client as HttpClient;
use std::time::Duration;
use url::Url;

/// Default timeout for a registry fetch. The event source enforces its own
/// response-time budget on the whole webhook delivery, so this must stay
/// seconds-scale.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Registry snapshot client
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http_client: HttpClient,
    registry_url: Url,
}

impl RegistryClient {
    /// Create a new registry client with the default fetch timeout
    pub fn new(registry_url: Url) -> RegistryClientResult<Self> {
        Self::with_timeout(registry_url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a new registry client with an explicit fetch timeout
    pub fn with_timeout(registry_url: Url, timeout: Duration) -> RegistryClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("relay-registry-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            registry_url,
        })
    }

    /// Create a client from a registry URL string
    pub fn from_url(registry_url: &str) -> RegistryClientResult<Self> {
        let registry_url = Url::parse(registry_url)?;
        Self::new(registry_url)
    }

    /// Get the configured registry location
    pub fn registry_url(&self) -> &Url {
        &self.registry_url
    }
}

#[async_trait]
impl RegistrySource for RegistryClient {
    async fn fetch_snapshot(&self) -> RegistryClientResult<RegistryDocument> {
        let response = self.http_client.get(self.registry_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryClientError::UnexpectedStatus { status, body });
        }

        // Decode from text rather than response.json() so a corrupted
        // document is reported as Malformed, not as a transport error.
        let text = response.text().await?;
        let document: RegistryDocument = serde_json::from_str(&text)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RegistryClient::from_url("https://registry.example.com/repositories.json")
            .expect("client");
        assert_eq!(
            client.registry_url().as_str(),
            "https://registry.example.com/repositories.json"
        );
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(RegistryClient::from_url("not a url").is_err());
    }
}
