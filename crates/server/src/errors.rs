use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Message;
use service::errors::ServiceError;
use tracing::error;

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const NOT_FOUND: &str = "Entry not found";

/// Error body `{"message": ...}`. `detail` is only ever logged.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    pub fn internal(detail: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, Some(detail.to_string()))
    }

    /// Map a service failure, logging anything that becomes a 500 under `context`.
    pub fn from_service(context: &'static str, e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg, None),
            ServiceError::NotFound(detail) => Self::new(StatusCode::NOT_FOUND, NOT_FOUND, Some(detail)),
            other => {
                error!(err = %other, "{}", context);
                Self::internal(other)
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Message::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let e = JsonApiError::from_service("t", ServiceError::Validation("Value is required".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Value is required");

        let e = JsonApiError::from_service("t", ServiceError::not_found("entry"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, NOT_FOUND);

        let e = JsonApiError::from_service("t", ServiceError::Db("connection reset".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, INTERNAL_ERROR);
        assert_eq!(e.detail.as_deref(), Some("database error: connection reset"));

        let e = JsonApiError::from_service("t", ServiceError::Model(ModelError::Validation("value must be a number".into())));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, INTERNAL_ERROR);
    }
}
