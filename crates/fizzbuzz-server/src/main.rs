//! fizzbuzz-server
//!
//! - `GET /fizzbuzz?int1=&int2=&limit=&str1=&str2=`
//! - `GET /metrics`, `GET /metrics/top`
//! - `GET /healthz`, `GET /readyz`
//!
//! Config path comes from the first argument or `FIZZBUZZ_CONFIG`; without
//! one, built-in defaults apply. `FIZZBUZZ_LISTEN` overrides `server.listen`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fizzbuzz_core::error::{FizzBuzzError, Result};
use fizzbuzz_server::{app_state::AppState, config, server};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "fizzbuzz-server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FIZZBUZZ_CONFIG").ok());
    let cfg = config::load(path.as_deref(), std::env::var("FIZZBUZZ_LISTEN").ok())?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| FizzBuzzError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "fizzbuzz-server starting");

    server::serve(listener, state, server::shutdown_signal()).await
}
