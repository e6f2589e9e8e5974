use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::{EMAILS_FAILED, EMAILS_SENT, SEND_LATENCY};
use crate::models::{EmailRequest, StatusResponse};
use crate::state::AppState;
use crate::transport::SendMethod;

type SendResult = Result<Json<StatusResponse>, AppError>;

pub async fn send_email_smtp(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> SendResult {
    dispatch(&state, SendMethod::Smtp, payload).await
}

pub async fn send_email_sendgrid(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> SendResult {
    dispatch(&state, SendMethod::SendGrid, payload).await
}

pub async fn send_email_ses(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> SendResult {
    dispatch(&state, SendMethod::Ses, payload).await
}

// validate, then hand off to exactly one transport - no retry, no fallback
async fn dispatch(
    state: &AppState,
    method: SendMethod,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> SendResult {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.validate().map_err(AppError::Validation)?;

    let label = method.label();
    let timer = SEND_LATENCY.with_label_values(&[label]).start_timer();
    let result = state
        .transport(method)
        .send(&request.to, &request.subject, &request.body)
        .await;
    timer.observe_duration();

    match result {
        Ok(()) => {
            EMAILS_SENT.with_label_values(&[label]).inc();
            tracing::info!(method = label, to = %request.to, "email sent");
            Ok(Json(StatusResponse::success(
                method.success_message(),
                Some(label),
            )))
        }
        Err(source) => {
            EMAILS_FAILED.with_label_values(&[label]).inc();
            Err(AppError::Transport {
                method: label,
                source,
            })
        }
    }
}
