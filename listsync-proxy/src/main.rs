//! listsync proxy server
//!
//! Fronts the upstream mock REST API with the two collections the listsync
//! engines consume: a paged, enriched post feed and the full user list.
//!
//! Usage:
//!   listsync-proxy --port 3000 --upstream https://jsonplaceholder.typicode.com
//!
//! The proxy is stateless; every request is answered from the upstream.

use anyhow::{Context, Result};
use clap::Parser;
use listsync_proxy::{build_router, ProxyConfig, ProxyState};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "listsync-proxy")]
#[command(about = "Proxy server aggregating the upstream mock REST API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Base URL of the upstream mock API
    #[arg(short, long, default_value = "https://jsonplaceholder.typicode.com")]
    upstream: String,

    /// Number of album photos attached to each post
    #[arg(long, default_value = "3")]
    images_per_post: usize,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = ProxyConfig {
        upstream_base_url: args.upstream,
        images_per_post: args.images_per_post,
        timeout_secs: args.timeout_secs,
    };
    info!("listsync proxy starting, upstream {}", config.upstream_base_url);

    let state = Arc::new(ProxyState::new(&config).context("Failed to create upstream client")?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind port {}", args.port))?;
    info!("HTTP API listening on port {}", args.port);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
