use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crop_core::Error;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            Error::Io(e) => {
                tracing::error!(detail = %e, "IO error");
                "A file system error occurred".to_string()
            }
            Error::Serialization(e) => {
                tracing::error!(detail = %e, "Serialization error");
                "Failed to encode the response".to_string()
            }
            Error::External(e) => {
                tracing::error!(detail = %e, "External error");
                "An internal error occurred".to_string()
            }
            Error::Validation(reason) => {
                tracing::warn!(kind = self.0.kind(), "{}", reason);
                reason.clone()
            }
            e => {
                tracing::error!(kind = e.kind(), "{}", e);
                e.to_string()
            }
        };

        let body = Json(json!({
            "error": true,
            "kind": self.0.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
