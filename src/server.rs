//! HTTP server for the storefront assistant.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | Reply to one chat message |
//! | `GET`  | `/api/products` | Ranked catalog search (`q`, `limit`) |
//! | `POST` | `/api/contact` | Escalation form submission |
//! | `GET`  | `/health` | Health check with content status |
//! | `GET`  | `/` | Embedded chat widget page |
//! | `GET`  | `/widget.js` | Widget script |
//!
//! # Error Contract
//!
//! Errors use one envelope:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "email must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `catalog_unavailable` (503).
//!
//! `/api/chat` never errors: a body that is not valid JSON, or lacks a
//! string `message`, is answered as an empty message.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the widget can be
//! embedded on the storefront's own domain.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::models::{ChatRequest, ChatResponse, ContactRequest, ProductMatch};
use crate::search::SearchOutcome;

const WIDGET_HTML: &str = include_str!("../static/widget.html");
const WIDGET_JS: &str = include_str!("../static/widget.js");

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }
}

/// Builds the application router. Split from [`run_server`] so tests can
/// serve it on an ephemeral port.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_widget_page))
        .route("/widget.js", get(handle_widget_script))
        .route("/api/chat", post(handle_chat))
        .route("/api/products", get(handle_products))
        .route("/api/contact", post(handle_contact))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the server.
///
/// FAQ and catalog are loaded once here and shared read-only by every
/// request. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let assistant = Arc::new(Assistant::load(config)?);
    let app = build_router(AppState::new(assistant));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "storefront assistant listening");
    println!("Listening on http://{}", config.server.bind);

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

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn catalog_unavailable() -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "catalog_unavailable".to_string(),
        message: "product catalog is not available".to_string(),
    }
}

// ============ Widget ============

async fn handle_widget_page() -> Html<&'static str> {
    Html(WIDGET_HTML)
}

async fn handle_widget_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        WIDGET_JS,
    )
}

// ============ POST /api/chat ============

/// Reads the message leniently: anything that does not parse as
/// `{ "message": string }` counts as an empty message.
fn parse_chat_body(body: &[u8]) -> String {
    serde_json::from_slice::<ChatRequest>(body)
        .map(|req| req.message)
        .unwrap_or_default()
}

async fn handle_chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let message = parse_chat_body(&body);
    let (intent, response) = state.assistant.answer(&message);
    info!(
        intent = %intent,
        chars = message.chars().count(),
        products = response.products.len(),
        "chat reply"
    );
    Json(response)
}

// ============ GET /api/products ============

#[derive(Debug, Deserialize)]
struct ProductQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ProductListResponse {
    products: Vec<ProductMatch>,
}

async fn handle_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductListResponse>, AppError> {
    let Query(params) = query.map_err(|e| bad_request(e.body_text()))?;
    if params.limit == Some(0) {
        return Err(bad_request("limit must be >= 1"));
    }
    match state.assistant.search(&params.q, params.limit) {
        SearchOutcome::CatalogUnavailable => Err(catalog_unavailable()),
        SearchOutcome::Matches(products) => Ok(Json(ProductListResponse { products })),
    }
}

// ============ POST /api/contact ============

#[derive(Serialize)]
struct ContactAck {
    status: &'static str,
}

fn validate_contact(req: &ContactRequest) -> Result<(), AppError> {
    for (field, value) in [
        ("name", &req.name),
        ("email", &req.email),
        ("message", &req.message),
    ] {
        if value.trim().is_empty() {
            return Err(bad_request(format!("{} must not be empty", field)));
        }
    }
    let email = req.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(bad_request("email is invalid")),
    }
}

/// Escalation form submission. The request is validated and logged for the
/// support team; nothing is stored.
async fn handle_contact(body: Bytes) -> Result<Json<ContactAck>, AppError> {
    let req: ContactRequest = serde_json::from_slice(&body)
        .map_err(|e| bad_request(format!("invalid contact request: {}", e)))?;
    validate_contact(&req)?;

    info!(
        name = %req.name.trim(),
        email = %req.email.trim(),
        message = %req.message.trim(),
        "contact request received"
    );

    Ok(Json(ContactAck { status: "received" }))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    /// `"ready"` or `"unavailable"`.
    catalog: String,
    /// `"ready"` or `"empty"`.
    faq: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = if state.assistant.catalog().is_available() {
        "ready"
    } else {
        "unavailable"
    };
    let faq = if state.assistant.faq().is_empty() {
        "empty"
    } else {
        "ready"
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: catalog.to_string(),
        faq: faq.to_string(),
    })
}
