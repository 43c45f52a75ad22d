//! Operational endpoints, answered in the service's JSON envelope.
//!
//! - `/healthz` : process is up
//! - `/readyz`  : accepting traffic, with metrics store totals; 503 once
//!   shutdown has begun

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::app_state::AppState;
use crate::http::respond;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Readiness {
    status: &'static str,
    /// Distinct request shapes recorded so far.
    shapes: usize,
    hits: u64,
}

pub async fn healthz() -> Response {
    respond::data(StatusCode::OK, Health { status: "ok" })
}

pub async fn readyz(State(state): State<AppState>) -> Response {
    if state.is_draining() {
        return respond::message(StatusCode::SERVICE_UNAVAILABLE, "draining");
    }
    let metrics = state.metrics();
    respond::data(
        StatusCode::OK,
        Readiness {
            status: "ready",
            shapes: metrics.len(),
            hits: metrics.total_hits(),
        },
    )
}
