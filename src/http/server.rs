//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create Axum Router mounting the gateway at the configured path
//! - Wire up middleware (tracing, request ID)
//! - Resolve, authorize, and forward each request
//! - Convert every failure into a JSON error response
//! - Serve with graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::forwarder::Forwarder;
use crate::http::request::{request_id, resolve_target, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::{relay_response, GatewayError};
use crate::lifecycle::shutdown::wait_for;
use crate::observability::metrics;
use crate::security::allowlist::Allowlist;
use crate::security::headers::sanitize_request_headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub allowlist: Arc<Allowlist>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server. The allowlist is frozen from here on.
    pub fn new(config: GatewayConfig, allowlist: Allowlist) -> Result<Self, reqwest::Error> {
        let allowlist = Arc::new(allowlist);
        let forwarder = Forwarder::new(&config.upstream, allowlist.clone())?;

        let state = AppState {
            allowlist,
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mount = config.listener.mount_path.trim_end_matches('/');

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(X_REQUEST_ID),
                MakeRequestUuid,
            ))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "gateway",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                X_REQUEST_ID,
            )));

        Router::new()
            .route(mount, any(proxy_handler))
            .route(&format!("{mount}/"), any(proxy_handler))
            .route(&format!("{mount}/{{*rest}}"), any(proxy_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.listener.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Gateway handler: resolve target, check allowlist, forward, relay.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request_id(request.headers()).to_string();

    match forward(&state, request, &request_id).await {
        Ok(response) => {
            metrics::record_request(
                &method,
                response.status().as_u16(),
                "forwarded",
                start_time,
            );
            response
        }
        Err(err) => {
            match &err {
                GatewayError::MissingTarget => {
                    tracing::debug!(request_id = %request_id, "Rejected request without target");
                    metrics::record_rejection(err.reason());
                }
                GatewayError::ForbiddenTarget { host } => {
                    tracing::warn!(request_id = %request_id, host = %host, "Blocked proxy target outside allowlist");
                    metrics::record_rejection(err.reason());
                }
                GatewayError::UpstreamUnreachable { url, .. } => {
                    tracing::error!(
                        request_id = %request_id,
                        url = %url,
                        error = err.detail().as_deref().unwrap_or_default(),
                        "Upstream request failed"
                    );
                }
            }
            metrics::record_request(
                &method,
                err.status().as_u16(),
                err.reason(),
                start_time,
            );
            err.into_response()
        }
    }
}

async fn forward(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let target = state.allowlist.authorize(resolve_target(&parts.headers)?)?;
    let headers = sanitize_request_headers(&parts.headers);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        target = %target,
        "Forwarding request"
    );

    let upstream = state
        .forwarder
        .forward(parts.method, target, headers, body)
        .await?;

    Ok(relay_response(upstream, request_id))
}
