//! HTTP API over a record store.
//!
//! Routes:
//! - `GET /api/trades` list with `q`, `status`, `from`, `to`, `page`, `pageSize`
//! - `POST /api/trades` create (201)
//! - `GET|PUT|DELETE /api/trades/:id`
//! - `GET /healthz`

use crate::application::query_builder::QueryBuilder;
use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{RecordStore, TradePage};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            DomainError::Validation(m) | DomainError::InvalidInput(m) => {
                (StatusCode::BAD_REQUEST, m.clone())
            }
            DomainError::SaveInProgress => (StatusCode::CONFLICT, self.0.to_string()),
            DomainError::Transport(_) => (StatusCode::BAD_GATEWAY, self.0.to_string()),
            DomainError::Database(_) => {
                tracing::error!(error = %self.0, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/trades", get(list_handler).post(create_handler))
        .route(
            "/api/trades/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

pub async fn serve(store: Arc<dyn RecordStore>, addr: SocketAddr) -> Result<(), DomainError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DomainError::Transport(format!("bind {addr}: {e}")))?;
    tracing::info!(%addr, "trades API listening");
    axum::serve(listener, build_router(AppState::new(store)))
        .await
        .map_err(|e| DomainError::Transport(format!("server error: {e}")))
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TradePage>, ApiError> {
    let query = QueryBuilder::from_params(&params)?;
    tracing::debug!(?query, "GET /api/trades");
    Ok(Json(state.store.list(&query).await?))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trade>, ApiError> {
    Ok(Json(state.store.get(&id).await?))
}

async fn create_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Trade>), ApiError> {
    let input = TradeInput::from_json(&body)?;
    let trade = state.store.create(input).await?;
    tracing::info!(id = %trade.id, "POST /api/trades");
    Ok((StatusCode::CREATED, Json(trade)))
}

async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Trade>, ApiError> {
    let input = TradeInput::from_json(&body)?;
    let trade = state.store.update(&id, input).await?;
    tracing::info!(%id, "PUT /api/trades/:id");
    Ok(Json(trade))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete(&id).await?;
    tracing::info!(%id, "DELETE /api/trades/:id");
    Ok(Json(json!({ "ok": true })))
}
