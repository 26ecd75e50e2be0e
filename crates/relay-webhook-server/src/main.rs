// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! publish-relay webhook server binary

use clap::Parser;
use relay_logging::{CliLogLevel, Level, LogFormat, init, redact};
use relay_webhook_server::{Server, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address for the server
    #[arg(short, long, env = "RELAY_BIND_ADDR", default_value = "127.0.0.1:3030")]
    bind: SocketAddr,

    /// Shared secret for inbound signature verification
    #[arg(long, env = "RELAY_WEBHOOK_SECRET", hide_env_values = true)]
    webhook_secret: String,

    /// Bearer credential for the outbound dispatch call
    #[arg(long, env = "RELAY_DISPATCH_TOKEN", hide_env_values = true)]
    dispatch_token: String,

    /// Location of the repository registry document
    #[arg(long, env = "RELAY_REGISTRY_URL")]
    registry_url: String,

    /// Trigger endpoint of the downstream publish handler
    #[arg(long, env = "RELAY_DISPATCH_URL")]
    dispatch_url: String,

    /// Host used when normalizing repository names into registry URL form
    #[arg(long, env = "RELAY_REGISTRY_HOST", default_value = "github.com")]
    registry_host: String,

    /// Manifest basename whose change triggers a dispatch
    #[arg(long, env = "RELAY_MANIFEST_BASENAME", default_value = "package.json")]
    manifest_basename: String,

    /// Timeout in seconds for the registry fetch
    #[arg(long, env = "RELAY_REGISTRY_TIMEOUT_SECS", default_value_t = 10)]
    registry_timeout_secs: u64,

    /// Timeout in seconds for the dispatch forward
    #[arg(long, env = "RELAY_DISPATCH_TIMEOUT_SECS", default_value_t = 10)]
    dispatch_timeout_secs: u64,

    /// Log level
    #[arg(short, long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Plaintext)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let default_level: Level = args.log_level.into();
    init("relay-webhook-server", default_level, args.log_format)?;

    tracing::info!(
        registry_url = %args.registry_url,
        dispatch_url = %args.dispatch_url,
        webhook_secret = %redact(&args.webhook_secret),
        dispatch_token = %redact(&args.dispatch_token),
        "Starting publish-relay webhook server"
    );

    let config = ServerConfig {
        bind_addr: args.bind,
        webhook_secret: args.webhook_secret,
        dispatch_token: args.dispatch_token,
        registry_url: args.registry_url,
        dispatch_url: args.dispatch_url,
        registry_host: args.registry_host,
        manifest_basename: args.manifest_basename,
        registry_timeout: Duration::from_secs(args.registry_timeout_secs),
        dispatch_timeout: Duration::from_secs(args.dispatch_timeout_secs),
    };

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
