//! JSON response envelope and error mapping.
//!
//! Success bodies are `{"data": ...}`, failures `{"message": "..."}`.
//! Status codes are decided here and nowhere else.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fizzbuzz_core::error::{ErrorKind, FizzBuzzError};

const JSON_UTF8: &str = "application/json; charset=utf-8";
const ENCODING_FAILED_BODY: &str = r#"{"message":"could not encode response"}"#;

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// Encode any serializable body as JSON.
///
/// Encoding failures are server-side: logged, then answered with a fixed 500
/// body. Nothing is retried.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_UTF8)], bytes).into_response(),
        Err(e) => {
            let err = FizzBuzzError::Encoding(e.to_string());
            tracing::error!(error = %err, "could not encode response to output");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_UTF8)],
                ENCODING_FAILED_BODY,
            )
                .into_response()
        }
    }
}

/// `{"data": data}`
pub fn data<T: Serialize>(status: StatusCode, data: T) -> Response {
    json(
        status,
        &Envelope {
            message: None,
            data: Some(data),
        },
    )
}

/// `{"message": msg}`
pub fn message(status: StatusCode, msg: &str) -> Response {
    json(
        status,
        &Envelope::<()> {
            message: Some(msg),
            data: None,
        },
    )
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Domain => StatusCode::BAD_REQUEST,
        ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Encoding | ErrorKind::Config | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handler-boundary error: every `FizzBuzzError` ends here as a response.
#[derive(Debug)]
pub struct ApiError(pub FizzBuzzError);

impl From<FizzBuzzError> for ApiError {
    fn from(e: FizzBuzzError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);

        if kind.is_client_error() {
            tracing::debug!(kind = kind.as_str(), error = %self.0, "request rejected");
        } else {
            tracing::error!(kind = kind.as_str(), error = %self.0, "request failed");
        }

        let mut resp = message(status, &self.0.to_string());
        if kind == ErrorKind::MethodNotAllowed {
            resp.headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        resp
    }
}
