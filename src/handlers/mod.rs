mod health;
mod metrics;
mod send_email;
mod welcome;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use send_email::{send_email_sendgrid, send_email_ses, send_email_smtp};
pub use welcome::welcome_handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::rate_limit::rate_limit_middleware;
use crate::state::AppState;

// Every route, the rate limiter in front of all of them
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(welcome_handler))
        .route("/api/", get(welcome_handler))
        .route("/api/send-email-smtp", post(send_email_smtp))
        .route("/api/send-email-sendgrid", post(send_email_sendgrid))
        .route("/api/send-email-ses", post(send_email_ses))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
