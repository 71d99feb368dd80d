use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

use crate::errors::{DeliveryError, ErrorKind};

// ============================================================================
// Error -> HTTP status
// ============================================================================
//
// Every failure leaves the API as a problem body:
//   { "status": 404, "title": "Not Found", "detail": "courier not found (..)" }
//
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl Problem {
    pub fn response(status: StatusCode, detail: impl Into<String>) -> HttpResponse {
        HttpResponse::build(status).json(Problem {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: detail.into(),
        })
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Business => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::External => StatusCode::BAD_GATEWAY,
    }
}

impl ResponseError for DeliveryError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        }
        Problem::response(status, self.to_string())
    }
}

/// Malformed JSON bodies get the same problem shape as domain errors.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    actix_web::error::InternalError::from_response(err, Problem::response(StatusCode::BAD_REQUEST, detail)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_status() {
        let cases = [
            (ErrorKind::Validation, 400),
            (ErrorKind::NotFound, 404),
            (ErrorKind::Business, 422),
            (ErrorKind::Conflict, 409),
            (ErrorKind::Storage, 500),
            (ErrorKind::External, 502),
        ];

        for (kind, status) in cases {
            assert_eq!(status_for(kind).as_u16(), status, "{kind:?}");
        }
    }

    #[test]
    fn test_delivery_error_response_carries_detail() {
        let err = DeliveryError::not_found("courier", None);

        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
