use axum::Json;

use crate::models::StatusResponse;

pub async fn welcome_handler() -> Json<StatusResponse> {
    Json(StatusResponse::success(
        "Welcome to Java Mailer Application!",
        None,
    ))
}
