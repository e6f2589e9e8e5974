mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod transport;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Args;
use crate::rate_limit::{MAX_REQUESTS, WINDOW, sweeper};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mail_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();

    let state = Arc::new(
        AppState::from_args(&args, reqwest::Client::new())
            .context("failed to set up mail transports")?,
    );

    // keep the rate limiter's client map from growing forever
    tokio::spawn(sweeper(
        Arc::clone(&state.rate_limiter),
        Duration::from_secs(args.sweep_interval.max(1)),
    ));

    let app = handlers::router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        max_requests = MAX_REQUESTS,
        window_secs = WINDOW.as_secs(),
        trust_forwarded_headers = args.trust_forwarded_headers,
        "mail gateway listening"
    );

    // peer addresses are needed to key the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
