//! Shared utilities for gateway integration tests.
#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::HeaderMap;
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use target_gateway::config::GatewayConfig;
use target_gateway::http::HttpServer;
use target_gateway::lifecycle::Shutdown;
use target_gateway::security::Allowlist;

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Requests received by a mock upstream.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub fn push(&self, recorded: Recorded) {
        self.inner.lock().unwrap().push(recorded);
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn last(&self) -> Recorded {
        self.inner
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("upstream received no request")
    }
}

/// Serve `app` on an ephemeral loopback port.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Accept TCP connections and close them without answering.
///
/// Returns the address and the number of accepted connections.
pub async fn start_hangup_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(socket);
        }
    });
    (addr, accepted)
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running gateway.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    /// URL of the gateway endpoint, optionally with a sub-path.
    pub fn url(&self, sub_path: &str) -> String {
        format!("http://{}/api/proxy{}", self.addr, sub_path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway that permits exactly `entries`.
pub async fn start_gateway(entries: &[String]) -> TestGateway {
    start_gateway_with(GatewayConfig::default(), entries).await
}

pub async fn start_gateway_with(config: GatewayConfig, entries: &[String]) -> TestGateway {
    let server = HttpServer::new(config, Allowlist::new(entries.to_vec())).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway { addr, shutdown }
}

/// Client that ignores environment proxies and never follows redirects itself.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

/// Allowlist entry for a mock upstream.
pub fn origin(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Collect a request body inside a mock upstream handler.
pub async fn read_body(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX).await.unwrap()
}
