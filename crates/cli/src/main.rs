//! `storefront` command-line entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags with environment fallbacks
//!    (`STOREFRONT_BASE_URL`, `STOREFRONT_PUBLISHABLE_KEY`,
//!    `STOREFRONT_AUTH_TOKEN`).
//! 2. **Wire observability**: `tracing-subscriber` with a pretty or JSON
//!    layer, plus an OpenTelemetry OTLP exporter when
//!    `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct infrastructure**: an [`transport::HttpStoreClient`] and the
//!    shared [`extensions::ClientOptions`].
//! 4. **Register plugins**: wishlist, reviews, PayPal and Econt, then run the
//!    selected sub-command and print its JSON response on stdout.

mod args;
mod commands;
mod observability;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use extensions::{BearerToken, ClientOptions, Extensions, ExtensionsBuilder, Headers};
use plugins::{EcontPlugin, PaypalPlugin, ReviewsPlugin, WishlistPlugin};
use transport::{HttpStoreClient, TransportConfig};

use crate::args::{Cli, ConnectionArgs};
use crate::observability::{init_observability, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let otlp_endpoint = cli.connection.otlp_endpoint.clone();
    let _telemetry = match init_observability(LogFormat::from_env(), otlp_endpoint.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let headers: Headers = cli.connection.headers.iter().cloned().collect();
    let extensions = build_extensions(&cli.connection)?;

    let response = commands::run(&extensions, cli.command, headers).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn build_extensions(connection: &ConnectionArgs) -> anyhow::Result<Extensions> {
    let base_url = connection
        .base_url
        .clone()
        .context("no store URL: pass --base-url or set STOREFRONT_BASE_URL")?;

    let mut config = TransportConfig::new(base_url);
    if let Some(key) = &connection.publishable_key {
        config = config.with_publishable_key(key.clone());
    }
    if let Some(secs) = connection.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = HttpStoreClient::new(&config).context("failed to build HTTP client")?;
    tracing::debug!(base_url = %client.base_url(), "store client ready");

    let mut options = ClientOptions::new().with_store_config(config.store_config());
    if let Some(token) = &connection.auth_token {
        options = options.with_auth(BearerToken::new(token.clone()));
    }

    let uploads = ReviewsPlugin::with_http_client(client.http_client().clone());
    let extensions = ExtensionsBuilder::new(client, options)
        .register(WishlistPlugin)
        .register(uploads)
        .register(PaypalPlugin)
        .register(EcontPlugin)
        .build()?;
    Ok(extensions)
}
