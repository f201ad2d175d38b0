pub mod ipo;
pub mod pages;
pub mod upload;

use axum::{Json, http::StatusCode};
use tracing::{error, warn};

use crate::models::ipo::ErrorResponse;

pub(crate) fn db_error(e: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %e, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
        }),
    )
}

pub(crate) fn validation_error(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    let message = message.into();
    warn!(error = %message, "Rejected write");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

pub(crate) fn not_found(id: i32) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("IPO {} not found", id),
        }),
    )
}
