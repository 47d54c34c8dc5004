//! Server Implementation
//!
//! Router assembly and the HTTP listener

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// Router with every API module registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::products::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::cart::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::staff::router())
        .merge(crate::api::reports::router())
        .merge(crate::api::feedback::router())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Fully configured application with middleware and state
///
/// Used by the HTTP listener and by in-process tests.
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // JWT authentication; require_auth skips the public routes itself
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(self) -> Result<()> {
        let state = self.state;

        // Periodic rate limiter cleanup (every 5 minutes)
        let limiter = state.rate_limiter.clone();
        let cleanup = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.purge();
            }
        });

        let app = build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "Dine server listening");

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        cleanup.abort();
        Ok(())
    }
}
