//! Storefront HTTP API.
//!
//! A small JSON API that runs beside the static site. The search index is
//! built once at startup and shared read-only across handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/health` | Health check (returns version) |
//! | `GET`  | `/api/search?q=..&limit=..` | Ranked product matches |
//! | `POST` | `/api/contact` | Validate and deliver a contact form submission |
//!
//! # Error Contract
//!
//! General errors:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "no route for /api/nope" } }
//! ```
//!
//! The contact route keeps the shape its form expects:
//!
//! ```json
//! { "success": false, "error": "Missing or invalid required fields." }
//! ```
//!
//! | Status | Contact failure |
//! |--------|-----------------|
//! | 400 | body is not JSON |
//! | 422 | missing, blank, malformed, or over-long field |
//! | 403 | bot verification failed |
//! | 500 | mail secret not configured |
//! | 502 | mail or verification API failed |
//!
//! # CORS
//!
//! Only `[server].allowed_origins` may call the API from a browser.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use forestal_core::contact::ContactPayload;
use forestal_core::search::{build_search_index, score_and_filter, SearchEntry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::contact::{DeliveryError, Mailer};
use crate::data;

/// Hard cap on `limit` regardless of what the client asks for.
const MAX_SEARCH_LIMIT: usize = 50;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    index: Arc<Vec<SearchEntry>>,
    mailer: Mailer,
}

/// Build the router with all routes and the CORS layer.
///
/// Loads products and builds the search index once. Fails on unreadable
/// data or an invalid origin in `[server].allowed_origins`.
pub fn build_app(config: &Config) -> Result<Router> {
    let products = data::load_products(config)?;
    let index = build_search_index(&products);
    info!(entries = index.len(), "search index built");

    let origins = config
        .server
        .allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid origin in server.allowed_origins: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let state = AppState {
        config: Arc::new(config.clone()),
        index: Arc::new(index),
        mailer: Mailer::new(config)?,
    };

    Ok(Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/search", get(handle_search))
        .route("/api/contact", post(handle_contact))
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state))
}

/// Bind to `[server].bind` and serve until the process is terminated.
pub async fn run_server(config: &Config) -> Result<()> {
    let app = build_app(config)?;
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    info!(addr = %config.server.bind, "api server listening");
    println!("Storefront API listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

async fn handle_not_found(uri: Uri) -> AppError {
    not_found(format!("no route for {}", uri.path()))
}

// ============ GET /api/health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    results: Vec<&'a SearchEntry>,
}

/// A missing or blank `q` yields no results. A malformed query string is a
/// 400 in the general error shape.
async fn handle_search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(rejection) => return bad_request(rejection.body_text()).into_response(),
    };
    let limit = params
        .limit
        .unwrap_or(state.config.search.max_results)
        .clamp(1, MAX_SEARCH_LIMIT);
    let results = score_and_filter(&state.index, &params.q, limit);
    Json(SearchResponse { results }).into_response()
}

// ============ POST /api/contact ============

/// Token field names used by the Turnstile widget and by custom forms.
const TOKEN_FIELDS: [&str; 2] = ["cf-turnstile-response", "turnstileToken"];

fn contact_failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

async fn handle_contact(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(body) = serde_json::from_slice::<Value>(&body) else {
        return contact_failure(StatusCode::BAD_REQUEST, "Invalid request body.");
    };

    let payload = match ContactPayload::validate(&body) {
        Ok(p) => p,
        Err(e) => {
            info!(reason = %e, "contact submission rejected");
            return contact_failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Missing or invalid required fields.",
            );
        }
    };

    let token = TOKEN_FIELDS
        .iter()
        .find_map(|f| body.get(*f).and_then(Value::as_str));
    match state.mailer.deliver(token, &payload).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => delivery_failure(e),
    }
}

fn delivery_failure(err: DeliveryError) -> Response {
    match err {
        DeliveryError::VerificationFailed => {
            contact_failure(StatusCode::FORBIDDEN, "Verification failed. Please try again.")
        }
        DeliveryError::NotConfigured(var) => {
            error!(var = %var, "contact delivery is not configured");
            contact_failure(StatusCode::INTERNAL_SERVER_ERROR, "Service configuration error.")
        }
        DeliveryError::Upstream(msg) => {
            warn!(error = %msg, "contact delivery failed");
            contact_failure(
                StatusCode::BAD_GATEWAY,
                "Failed to send message. Please try again.",
            )
        }
    }
}
