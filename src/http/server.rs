//! HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum Router with a catch-all handler for every method and path
//! - Wire up middleware (request spans)
//! - Forward requests to the single backend origin
//! - Map every failure to the error envelope
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::http::request::{InboundRequest, OutboundRequest};
use crate::http::response::relay_response;
use crate::lifecycle::shutdown::on_signal;
use crate::normalize::Normalizer;
use crate::observability::{metrics, tracing::make_request_span};

/// Pooled client for `http` and `https` backends.
pub type BackendClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: BackendClient,
    /// Backend origin, prepended verbatim to each path-plus-query.
    pub origin: Arc<str>,
    /// `None` when the fee pass is disabled.
    pub normalizer: Option<Normalizer>,
    pub max_body_bytes: usize,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        // Fails only when a provider is already installed for the process.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut connector = HttpConnector::new();
        connector.enforce_http(false);
        connector.set_connect_timeout(config.timeouts.connect_secs.map(Duration::from_secs));

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            origin: Arc::from(config.backend.url.as_str()),
            normalizer: config
                .normalizer
                .enabled
                .then(|| Normalizer::new(config.normalizer.max_depth)),
            max_body_bytes: config.limits.max_body_bytes,
            request_timeout: config.timeouts.request_secs.map(Duration::from_secs),
        }
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router: every method on every path goes to the relay.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
    }

    /// A copy of the router, for serving it some other way.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(on_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay one request and record its outcome.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = match relay(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(error = %e.message(), "Rejected inbound request");
            } else {
                tracing::error!(error = %e.message(), "Proxy error");
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// Build the outbound request, dispatch it, and shape the reply.
async fn relay(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let inbound = InboundRequest::read(request, state.max_body_bytes).await?;
    let outbound = OutboundRequest::build(&state.origin, &inbound)?;

    tracing::debug!(
        method = %outbound.method,
        target = %outbound.uri,
        body_bytes = outbound.body.as_ref().map(|b| b.len()).unwrap_or(0),
        "Proxying request"
    );

    match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, exchange(state, outbound))
            .await
            .map_err(|_| ProxyError::Timeout(limit))?,
        None => exchange(state, outbound).await,
    }
}

/// Dispatch to the backend and turn its answer into the client reply.
async fn exchange(state: &AppState, outbound: OutboundRequest) -> Result<Response, ProxyError> {
    let response = state.client.request(outbound.into_request()).await?;
    relay_response(response, state.normalizer.as_ref()).await
}
