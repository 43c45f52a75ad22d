//! Axum router wiring.
//!
//! - `/fizzbuzz`, `/metrics`, `/metrics/top` : service API
//! - `/healthz`, `/readyz`                   : ops

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{app_state::AppState, http::handlers, ops};

pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.cfg().server.request_timeout();

    Router::new()
        .route(
            "/fizzbuzz",
            get(handlers::fizzbuzz).fallback(handlers::method_not_allowed),
        )
        .route(
            "/metrics",
            get(handlers::metrics).fallback(handlers::method_not_allowed),
        )
        .route(
            "/metrics/top",
            get(handlers::top_hit).fallback(handlers::method_not_allowed),
        )
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
