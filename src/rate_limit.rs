use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::error::AppError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL, TRACKED_CLIENTS};
use crate::state::AppState;

// Fixed quota: 10 requests per client per minute
pub const MAX_REQUESTS: u32 = 10;
pub const WINDOW: Duration = Duration::from_secs(60);

// Entries untouched for this many windows are dropped by the sweeper
const STALE_WINDOWS: u32 = 2;

// Rate limit entry - tracks requests per client in the current window
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Admitted,
    Rejected,
}

impl RateLimitDecision {
    pub fn is_admitted(self) -> bool {
        self == RateLimitDecision::Admitted
    }
}

// Fixed-window request counter keyed by client id.
//
// Rejected requests still consume a slot: the count is incremented before it
// is compared against the quota.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_requests: MAX_REQUESTS,
            window: WINDOW,
        }
    }

    pub fn check(&self, client_id: &str, now: Instant) -> RateLimitDecision {
        // The entry guard holds the shard write lock until it is dropped, so
        // reset, increment and compare happen as one step per client.
        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // window expired..? start a fresh one
        if now.saturating_duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count = entry.count.saturating_add(1);

        if entry.count > self.max_requests {
            RateLimitDecision::Rejected
        } else {
            RateLimitDecision::Admitted
        }
    }

    // Current state for `client_id`, if it has been seen.
    pub fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.get(client_id).map(|e| *e)
    }

    // Drops clients whose window started more than STALE_WINDOWS windows ago
    pub fn sweep(&self, now: Instant) -> usize {
        let max_age = self.window * STALE_WINDOWS;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.window_start) < max_age);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Derives the rate-limit key for a request.
//
// Forwarding headers are only honoured when `trust_forwarded` is set, since
// any direct client can put whatever it likes in them.
pub fn client_id(headers: &HeaderMap, peer: SocketAddr, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = header_value(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        if let Some(ip) = header_value(headers, "x-real-ip")
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// Runs in front of every route
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    REQUEST_TOTAL.inc();

    let client = client_id(request.headers(), peer, state.trust_forwarded_headers);

    let decision = state.rate_limiter.check(&client, Instant::now());
    TRACKED_CLIENTS.set(state.rate_limiter.len() as f64);

    if decision.is_admitted() {
        return next.run(request).await;
    }

    RATE_LIMITED_TOTAL.inc();
    let count = state.rate_limiter.entry(&client).map(|e| e.count);
    tracing::warn!(
        client = %client,
        count = ?count,
        path = %request.uri().path(),
        "rate limit exceeded"
    );
    AppError::RateLimited.into_response()
}

// Background sweep - keeps the client map bounded
pub async fn sweeper(rate_limiter: Arc<RateLimiter>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    tracing::info!(interval = ?sweep_interval, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = rate_limiter.sweep(Instant::now());
        TRACKED_CLIENTS.set(rate_limiter.len() as f64);

        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = rate_limiter.len(),
                "swept stale rate limit entries"
            );
        }
    }
}
