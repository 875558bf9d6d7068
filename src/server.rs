//! HTTP API for the product catalog.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/health` | Health check (returns version) |
//! | `GET`    | `/api/products` | List every product |
//! | `GET`    | `/api/products/search?keyword=..` | Keyword search |
//! | `GET`    | `/api/products/{id}` | Fetch one product |
//! | `POST`   | `/api/products` | Create a product (201) |
//! | `PUT`    | `/api/products/{id}` | Replace a product's attributes |
//! | `DELETE` | `/api/products/{id}` | Delete a product (204) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "keyword is required" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `data_access` (503).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser storefronts
//! can call the API directly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{NewProduct, Product};
use crate::store::{ProductStore, SqliteProductStore};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    store: Arc<dyn ProductStore>,
}

/// Starts the HTTP server against the configured SQLite database.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = SqliteProductStore::connect(config).await?;
    run_server_with_store(&config.server.bind, Arc::new(store)).await
}

/// Starts the HTTP server on `bind` over any [`ProductStore`].
pub async fn run_server_with_store(
    bind: &str,
    store: Arc<dyn ProductStore>,
) -> anyhow::Result<()> {
    let app = router(store);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "product API listening");
    println!("Product API listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the API router over `store`.
pub fn router(store: Arc<dyn ProductStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/products", get(handle_list).post(handle_create))
        .route("/api/products/search", get(handle_search))
        .route(
            "/api/products/{id}",
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .layer(cors)
        .with_state(AppState { store })
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

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError {
                status: StatusCode::NOT_FOUND,
                code: "not_found",
                message: err.to_string(),
            },
            StoreError::Invalid(msg) => bad_request(msg),
            StoreError::DataAccess(ref e) => {
                tracing::error!(error = %e, "data access failure");
                AppError {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    code: "data_access",
                    message: err.to_string(),
                }
            }
        }
    }
}

// ============ GET /health ============

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

// ============ Products ============

#[derive(Deserialize)]
struct SearchParams {
    keyword: Option<String>,
}

/// `GET /api/products/search?keyword=..`
///
/// A missing `keyword` is rejected; `keyword=` (empty) is a valid search
/// that returns every product with at least one non-null text field.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let keyword = params
        .keyword
        .ok_or_else(|| bad_request("keyword is required"))?;
    let products = state.store.search(&keyword).await?;
    Ok(Json(products))
}

async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.store.list().await?))
}

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| StoreError::NotFound(id).into())
}

async fn handle_create(
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let created = state.store.insert(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(product): Json<NewProduct>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.store.update(id, &product).await?))
}

async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StoreError::NotFound(id).into())
    }
}
