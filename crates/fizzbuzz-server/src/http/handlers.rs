//! fizzbuzz and metrics handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Response,
};

use fizzbuzz_core::FizzBuzzError;

use crate::app_state::AppState;
use crate::http::params::FizzBuzzParams;
use crate::http::respond::{self, ApiError};

type QueryPairs = Vec<(String, String)>;

/// `GET /fizzbuzz?int1=&int2=&limit=&str1=&str2=`
///
/// A hit is recorded only after the generator succeeds, so zero divisors and
/// other rejected requests never show up in `/metrics`.
pub async fn fizzbuzz(
    State(app): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query
        .map_err(|e| FizzBuzzError::validation(format!("invalid query string: {e}")))?;

    let shape = FizzBuzzParams::from_pairs(pairs).into_shape(app.cfg().generator.max_limit)?;
    let seq = shape.generate()?;

    tracing::debug!(
        int1 = shape.int1,
        int2 = shape.int2,
        limit = shape.limit,
        "fizzbuzz computed"
    );
    app.metrics().record(shape);

    Ok(respond::data(StatusCode::OK, seq))
}

/// `GET /metrics`: bare array of `{request, hits}`.
pub async fn metrics(State(app): State<AppState>) -> Response {
    let snapshot = app.metrics().snapshot();
    respond::json(StatusCode::OK, &snapshot)
}

/// `GET /metrics/top`: the most requested shape.
pub async fn top_hit(State(app): State<AppState>) -> Result<Response, ApiError> {
    let top = app.metrics().top_hit()?;
    Ok(respond::data(StatusCode::OK, top))
}

pub async fn method_not_allowed() -> ApiError {
    FizzBuzzError::MethodNotAllowed.into()
}
