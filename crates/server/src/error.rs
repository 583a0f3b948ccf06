use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use enjoyrecord_core::error::{ApiError, ErrorEnvelope};
use enjoyrecord_search::SearchError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        Self(search_api_error(&e))
    }
}

/// Classify a search failure into an HTTP-facing error, keeping its message.
pub fn search_api_error(e: &SearchError) -> ApiError {
    let message = e.to_string();
    match e.representative() {
        SearchError::MissingApiKey { .. } => ApiError::ServiceUnavailable(message),
        SearchError::Timeout { .. } => ApiError::GatewayTimeout(message),
        SearchError::Unauthorized { .. } => ApiError::Unauthorized(message),
        SearchError::UnsupportedSource(_) => ApiError::BadRequest(message),
        SearchError::UpstreamStatus { .. }
        | SearchError::Network { .. }
        | SearchError::Parse { .. }
        | SearchError::AllProvidersFailed { .. } => ApiError::BadGateway(message),
    }
}
