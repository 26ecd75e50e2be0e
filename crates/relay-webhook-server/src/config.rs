// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Webhook server configuration.
///
/// All secrets and locations are environment-supplied through the binary's
/// argument parser; this component has no other CLI surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Shared secret used to verify inbound event signatures
    pub webhook_secret: String,

    /// Bearer credential for the outbound dispatch call
    pub dispatch_token: String,

    /// Location of the repository registry document
    pub registry_url: String,

    /// Trigger endpoint of the downstream publish handler
    pub dispatch_url: String,

    /// Host used when normalizing `owner/name` into registry URL form
    pub registry_host: String,

    /// Manifest basename whose change makes an event package-relevant
    pub manifest_basename: String,

    /// Timeout applied to the registry fetch
    pub registry_timeout: Duration,

    /// Timeout applied to the dispatch forward
    pub dispatch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3030".parse().expect("valid socket address"),
            webhook_secret: String::new(),
            dispatch_token: String::new(),
            registry_url: "https://registry.example.com/repositories.json".to_string(),
            dispatch_url: "https://dispatch.example.com/trigger".to_string(),
            registry_host: "github.com".to_string(),
            manifest_basename: "package.json".to_string(),
            registry_timeout: Duration::from_secs(10),
            dispatch_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_node_manifest() {
        let config = ServerConfig::default();
        assert_eq!(config.manifest_basename, "package.json");
        assert_eq!(config.registry_host, "github.com");
        assert!(config.registry_timeout <= Duration::from_secs(30));
        assert!(config.dispatch_timeout <= Duration::from_secs(30));
    }
}
