use crate::error::{ProfileError, RenderError};
use std::any::Any;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// The only error message clients see. Details are logged.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to generate image";

/// Failure to produce a card.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Invalid query: {}", .0)]
    Query(#[from] QueryRejection),
    #[error("Render task failed: {}", .0)]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Error generating card: {self}");
        generic_error_response()
    }
}

fn generic_error_response() -> Response {
    let body = json!({
        "error": GENERIC_ERROR_MESSAGE,
    });

    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

/// Responds to a panicking handler the same way as to any other failure.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    log::error!("Handler panicked: {message}");
    generic_error_response()
}
