//! HTTP server mode: the mock endpoint and the interception scripts

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::ShapeCache;
use crate::error::{Error, Result};
use crate::schema::{InferenceOptions, SchemaInferrer};

/// Service worker that forwards fetch responses to `/mock`
const MOCK_SCRIPT: &str = include_str!("../../assets/mock.js");

/// Snippet that registers [`MOCK_SCRIPT`]
const REGISTER_SCRIPT: &str = include_str!("../../assets/register.js");

/// Placeholder in [`MOCK_SCRIPT`] replaced with the public origin
const ORIGIN_PLACEHOLDER: &str = "__SHAPE_MOCK_ORIGIN__";

/// Response header reporting what the cache did with a body
pub const OUTCOME_HEADER: &str = "shape-mock-outcome";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origin the interception script posts back to
    pub public_origin: String,
    /// Inference settings for the cache
    pub inference: InferenceOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(3000)
    }
}

impl ServerConfig {
    /// Create a configuration listening on all interfaces at `port`
    pub fn new(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            public_origin: format!("http://localhost:{port}"),
            inference: InferenceOptions::default(),
        }
    }

    /// Set the bind address
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the origin advertised to the interception script
    #[must_use]
    pub fn with_public_origin(mut self, origin: impl Into<String>) -> Self {
        self.public_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Set inference options
    #[must_use]
    pub fn with_inference(mut self, inference: InferenceOptions) -> Self {
        self.inference = inference;
        self
    }

    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid bind address {}: {e}", self.host)))
    }
}

/// App state shared across handlers
struct AppState {
    config: ServerConfig,
    cache: Arc<ShapeCache>,
}

/// Request body for the mock endpoint
#[derive(Debug, Deserialize)]
struct MockRequest {
    /// URL of the intercepted request
    endpoint: String,
    /// HTTP method of the intercepted request
    method: String,
    /// Response body; absent is different from `null`
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn error_response(err: &Error) -> Response {
    (
        err.status_code(),
        Json(ApiResponse::<()>::error(err.to_string())),
    )
        .into_response()
}

/// Build the router with a fresh cache
pub fn router(config: ServerConfig) -> Router {
    let cache = Arc::new(ShapeCache::with_inferrer(SchemaInferrer::with_options(
        config.inference,
    )));
    router_with_cache(config, cache)
}

/// Build the router around an existing cache
pub fn router_with_cache(config: ServerConfig, cache: Arc<ShapeCache>) -> Router {
    let state = AppState { config, cache };

    // The interception script runs on arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::HeaderName::from_static(OUTCOME_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .route("/mock", post(mock))
        .route("/mock.js", get(mock_script))
        .route("/register.js", get(register_script))
        .route("/mocks", get(list_mocks).delete(clear_mocks))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.addr()?;
    let app = router(config);

    tracing::info!("Starting mock server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Observe an intercepted response and return the body the page should see
async fn mock(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req: MockRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return error_response(&Error::invalid_request(e.to_string())),
    };

    let Some(data) = req.data else {
        tracing::warn!(endpoint = %req.endpoint, "Mock request without data");
        return error_response(&Error::unclassifiable("$.data"));
    };

    match state.cache.observe(&req.method, &req.endpoint, data).await {
        Ok(observation) => {
            let mut response = Json(observation.data).into_response();
            response.headers_mut().insert(
                OUTCOME_HEADER,
                HeaderValue::from_static(observation.outcome.as_str()),
            );
            response
        }
        Err(e) if e.is_input_error() => {
            tracing::info!(endpoint = %req.endpoint, error = %e, "Rejected response body");
            error_response(&e)
        }
        Err(e) => {
            tracing::warn!(
                method = %req.method,
                endpoint = %req.endpoint,
                error = %e,
                "Schema inference failed"
            );
            error_response(&e)
        }
    }
}

/// Interception service worker, pointed back at this server
async fn mock_script(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let script = MOCK_SCRIPT.replace(ORIGIN_PLACEHOLDER, &state.config.public_origin);
    ([(header::CONTENT_TYPE, "application/javascript")], script)
}

/// Service worker registration snippet
async fn register_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        REGISTER_SCRIPT,
    )
}

/// List stored entries
async fn list_mocks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mocks: Vec<Value> = state
        .cache
        .entries()
        .await
        .into_iter()
        .map(|(key, entry)| {
            json!({
                "key": key.as_str(),
                "schema": entry.schema,
                "data": entry.data
            })
        })
        .collect();

    Json(ApiResponse::success(json!({
        "type": "MOCKS",
        "mocks": mocks
    })))
}

/// Drop every stored entry
async fn clear_mocks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cleared = state.cache.len().await;
    state.cache.clear().await;
    tracing::info!(cleared, "Cleared mock cache");

    Json(ApiResponse::success(json!({ "cleared": cleared })))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
