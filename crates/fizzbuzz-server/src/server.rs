//! Accept loop with per-connection timeouts and bounded shutdown.
//!
//! Each accepted socket is served by hyper's http1 connection driver:
//! - `server.read_timeout_ms` bounds how long a client may take to send a
//!   request head
//! - `server.idle_timeout_ms` closes keep-alive connections with nothing in
//!   flight
//! - `server.request_timeout_ms` is enforced per request by the router
//!
//! Once the shutdown future resolves the listener is closed, readiness flips
//! to draining, and every connection is asked to finish its current request.
//! Connections still open after `server.shutdown_grace_ms` are aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::ServiceExt;

use fizzbuzz_core::error::Result;

use crate::{app_state::AppState, router};

/// Serve the service router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let app = router::build_router(state.clone());
    serve_app(listener, app, state, shutdown).await
}

/// Serve an already built router. Timeouts and the grace period come from
/// `state`'s config.
pub async fn serve_app<F>(
    listener: TcpListener,
    app: Router,
    state: AppState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let limits = ConnLimits {
        read_timeout: state.cfg().server.read_timeout(),
        idle_timeout: state.cfg().server.idle_timeout(),
    };
    let grace = state.cfg().server.shutdown_grace();

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut conns = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    conns.spawn(serve_connection(stream, peer, app.clone(), limits, stop_rx.clone()));
                }
                Err(e) => {
                    // usually fd exhaustion; back off instead of spinning
                    tracing::warn!(error = %e, "accept failed");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },
            Some(res) = conns.join_next(), if !conns.is_empty() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        tracing::error!(error = %e, "connection task panicked");
                    }
                }
            }
        }
    }

    drop(listener);
    state.set_draining();
    tracing::info!(
        grace_ms = millis(grace),
        open = conns.len(),
        "starting graceful server shutdown"
    );
    let _ = stop_tx.send(true);

    let drained = tokio::time::timeout(grace, async {
        while conns.join_next().await.is_some() {}
    })
    .await;

    match drained {
        Ok(()) => tracing::info!("server shutdown gracefully"),
        Err(_) => {
            tracing::warn!(
                grace_ms = millis(grace),
                remaining = conns.len(),
                "grace period elapsed, aborting open connections"
            );
            conns.shutdown().await;
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct ConnLimits {
    read_timeout: Duration,
    idle_timeout: Duration,
}

/// Request bookkeeping for one connection, read by the idle watchdog.
struct Activity {
    opened: Instant,
    in_flight: AtomicUsize,
    // millis since `opened`
    last_active: AtomicU64,
}

impl Activity {
    fn new() -> Self {
        Self {
            opened: Instant::now(),
            in_flight: AtomicUsize::new(0),
            last_active: AtomicU64::new(0),
        }
    }

    fn enter(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.touch();
        InFlight(Arc::clone(self))
    }

    fn touch(&self) {
        self.last_active
            .store(millis(self.opened.elapsed()), Ordering::Release);
    }

    /// How long the connection has had no request in flight.
    fn idle_for(&self) -> Option<Duration> {
        if self.in_flight.load(Ordering::Acquire) > 0 {
            return None;
        }
        let last = Duration::from_millis(self.last_active.load(Ordering::Acquire));
        Some(self.opened.elapsed().saturating_sub(last))
    }
}

struct InFlight(Arc<Activity>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.touch();
        self.0.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    limits: ConnLimits,
    mut stop: watch::Receiver<bool>,
) {
    let activity = Arc::new(Activity::new());

    let service = {
        let activity = Arc::clone(&activity);
        service_fn(move |req: Request<Incoming>| {
            let guard = activity.enter();
            let app = app.clone();
            async move {
                let res = app.oneshot(req).await;
                drop(guard);
                res
            }
        })
    };

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(limits.read_timeout);
    let conn = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let mut watchdog = tokio::time::interval(watchdog_period(limits.idle_timeout));
    watchdog.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut closing = false;

    loop {
        tokio::select! {
            res = conn.as_mut() => {
                if let Err(e) = res {
                    if !e.is_incomplete_message() {
                        tracing::debug!(%peer, error = %e, "connection error");
                    }
                }
                break;
            }
            _ = stop.changed(), if !closing => {
                closing = true;
                conn.as_mut().graceful_shutdown();
            }
            _ = watchdog.tick(), if !closing => {
                if activity.idle_for().is_some_and(|d| d >= limits.idle_timeout) {
                    tracing::debug!(%peer, "closing idle connection");
                    closing = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }
}

fn watchdog_period(idle: Duration) -> Duration {
    (idle / 4).clamp(Duration::from_millis(10), Duration::from_secs(1))
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("caught SIGINT"),
        _ = terminate => tracing::info!("caught SIGTERM"),
    }
}
