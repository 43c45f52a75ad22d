//! Live-socket tests for the serve loop and its shutdown drain.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use axum::{routing::get, Router};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use fizzbuzz_core::error::Result;
use fizzbuzz_server::{app_state::AppState, config::AppConfig, router, server};

struct TestServer {
    address: String,
    state: AppState,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<()>>,
}

impl TestServer {
    async fn start(cfg: AppConfig) -> Self {
        Self::start_with(cfg, |_| Router::new()).await
    }

    /// Start with extra routes merged onto the service router.
    async fn start_with(cfg: AppConfig, extra: impl FnOnce(&AppState) -> Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to port 0");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let state = AppState::new(cfg).unwrap();
        let app = router::build_router(state.clone()).merge(extra(&state));
        let (stop, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve_app(listener, app, state.clone(), async move {
            let _ = stop_rx.await;
        }));

        Self {
            address,
            state,
            stop: Some(stop),
            handle,
        }
    }

    fn addr(&self) -> &str {
        self.address.trim_start_matches("http://")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn shutdown(mut self) -> (AppState, Result<()>) {
        self.stop.take().unwrap().send(()).unwrap();
        let res = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("serve did not return")
            .unwrap();
        (self.state, res)
    }
}

#[tokio::test]
async fn serves_fizzbuzz_and_metrics_over_tcp() {
    let srv = TestServer::start(AppConfig::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(srv.url("/fizzbuzz"))
        .query(&[("int1", "3"), ("int2", "5"), ("limit", "15"), ("str1", "Fizz"), ("str2", "Buzz")])
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][14], "FizzBuzz");

    let resp = client
        .post(srv.url("/fizzbuzz"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), 405);

    let rows: Value = client
        .get(srv.url("/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["hits"], 1);

    let (state, res) = srv.shutdown().await;
    res.unwrap();
    assert!(state.is_draining());
}

#[tokio::test]
async fn concurrent_clients_lose_no_hits() {
    let srv = TestServer::start(AppConfig::default()).await;
    let client = reqwest::Client::new();
    const N: usize = 300;

    let mut tasks = Vec::with_capacity(N);
    for i in 0..N {
        let client = client.clone();
        // two shapes, interleaved
        let url = if i % 3 == 0 {
            srv.url("/fizzbuzz?int1=2&int2=7&limit=20&str1=a&str2=b")
        } else {
            srv.url("/fizzbuzz?int1=3&int2=5&limit=20&str1=Fizz&str2=Buzz")
        };
        tasks.push(tokio::spawn(async move {
            let resp = client.get(url).send().await.unwrap();
            assert_eq!(resp.status(), 200);
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let mut hits: Vec<u64> = srv
        .state
        .metrics()
        .snapshot()
        .into_iter()
        .map(|e| e.hits)
        .collect();
    hits.sort();
    assert_eq!(hits, vec![100, 200]);

    let (_, res) = srv.shutdown().await;
    res.unwrap();
}

#[tokio::test]
async fn stops_accepting_after_shutdown() {
    let srv = TestServer::start(AppConfig::default()).await;
    let url = srv.url("/healthz");

    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);

    let (_, res) = srv.shutdown().await;
    res.unwrap();

    // fresh client, no pooled connection to reuse
    let err = reqwest::Client::new().get(&url).send().await;
    assert!(err.is_err(), "listener must be closed after shutdown");
}

#[tokio::test]
async fn zero_grace_returns_promptly() {
    let mut cfg = AppConfig::default();
    cfg.server.shutdown_grace_ms = 0;
    let srv = TestServer::start(cfg).await;

    let (_, res) = srv.shutdown().await;
    res.unwrap();
}

/// Read until the server closes the socket, or fail after `within`.
async fn read_until_closed(sock: &mut TcpStream, within: Duration) -> Vec<u8> {
    let mut buf = Vec::new();
    // Ok on FIN, Err on reset; either way the server closed it
    let _ = tokio::time::timeout(within, sock.read_to_end(&mut buf))
        .await
        .expect("server kept the connection open");
    buf
}

#[tokio::test]
async fn partial_request_head_is_dropped_after_read_timeout() {
    let mut cfg = AppConfig::default();
    cfg.server.read_timeout_ms = 200;
    let srv = TestServer::start(cfg).await;

    let mut sock = TcpStream::connect(srv.addr()).await.unwrap();
    sock.write_all(b"GET /fizzbuzz?int1=3 HTTP/1.1\r\nHost: x\r\n")
        .await
        .unwrap();

    let buf = read_until_closed(&mut sock, Duration::from_secs(3)).await;
    assert!(!buf.starts_with(b"HTTP/1.1 200"));
    assert!(srv.state.metrics().snapshot().is_empty());

    let (_, res) = srv.shutdown().await;
    res.unwrap();
}

#[tokio::test]
async fn idle_keep_alive_connection_is_closed() {
    let mut cfg = AppConfig::default();
    cfg.server.idle_timeout_ms = 200;
    let srv = TestServer::start(cfg).await;

    let mut sock = TcpStream::connect(srv.addr()).await.unwrap();
    sock.write_all(b"GET /healthz HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();

    let buf = read_until_closed(&mut sock, Duration::from_secs(3)).await;
    assert!(buf.starts_with(b"HTTP/1.1 200"), "{}", String::from_utf8_lossy(&buf));

    let (_, res) = srv.shutdown().await;
    res.unwrap();
}

#[tokio::test]
async fn grace_period_aborts_in_flight_requests() {
    let mut cfg = AppConfig::default();
    cfg.server.shutdown_grace_ms = 200;
    let srv = TestServer::start_with(cfg, |_| {
        Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        )
    })
    .await;

    let mut sock = TcpStream::connect(srv.addr()).await.unwrap();
    sock.write_all(b"GET /slow HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();
    // let the request reach the handler
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = std::time::Instant::now();
    let (state, res) = srv.shutdown().await;
    res.unwrap();
    assert!(state.is_draining());
    assert!(started.elapsed() < Duration::from_secs(5));

    let buf = read_until_closed(&mut sock, Duration::from_secs(3)).await;
    assert!(buf.is_empty(), "{}", String::from_utf8_lossy(&buf));
}
