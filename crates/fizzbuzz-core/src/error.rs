//! Shared error type across fizzbuzz crates.

use thiserror::Error;

/// Error kinds (stable API). Frontends map these onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed client input.
    Validation,
    /// Request method not accepted by the endpoint.
    MethodNotAllowed,
    /// Input that parses but has no defined result (zero divisor).
    Domain,
    /// Response serialization failed.
    Encoding,
    /// Nothing to return.
    NotFound,
    /// Invalid configuration at startup.
    Config,
    /// Internal server error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorKind::Domain => "DOMAIN",
            ErrorKind::Encoding => "ENCODING",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Whether the caller, not the server, is at fault.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::MethodNotAllowed
                | ErrorKind::Domain
                | ErrorKind::NotFound
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FizzBuzzError>;

/// Unified error type used by core and server.
///
/// `Display` output is what clients see in the `message` field, so the
/// validation messages are kept verbatim.
#[derive(Debug, Error)]
pub enum FizzBuzzError {
    #[error("{0}")]
    Validation(String),
    #[error("only the http method GET is accepted")]
    MethodNotAllowed,
    #[error("int1 and int2 must be non-zero")]
    DivisionByZero,
    #[error("limit {0} is too large")]
    LimitTooLarge(i64),
    #[error("could not encode response: {0}")]
    Encoding(String),
    #[error("{0}")]
    NotFound(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FizzBuzzError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FizzBuzzError::Validation(_) => ErrorKind::Validation,
            FizzBuzzError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            FizzBuzzError::DivisionByZero => ErrorKind::Domain,
            FizzBuzzError::LimitTooLarge(_) => ErrorKind::Validation,
            FizzBuzzError::Encoding(_) => ErrorKind::Encoding,
            FizzBuzzError::NotFound(_) => ErrorKind::NotFound,
            FizzBuzzError::Config(_) => ErrorKind::Config,
            FizzBuzzError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FizzBuzzError::Validation(msg.into())
    }
}
