//! HTTP routes

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use crate::chart::{ChartDirective, extract_directive};
use crate::history::{DEFAULT_PERIOD, PricePoint, fetch_history};
use crate::tools::normalize_symbol;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartDirective>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub period: String,
    pub data: Vec<PricePoint>,
}

/// Build the application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/history", get(history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "System Operational. Agent Ready." }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.agent.process(request.message).await?;
    let chart = extract_directive(&response);
    info!(
        response_length = response.len(),
        chart = chart.as_ref().map(|c| c.symbol.as_str()),
        "Chat answered"
    );
    Ok(Json(ChatResponse { response, chart }))
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .and_then(normalize_symbol)
        .ok_or_else(|| ApiError::Validation("Query parameter 'symbol' is required".to_string()))?;
    let period = query
        .period
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PERIOD.to_string());

    let data = fetch_history(state.market.as_ref(), &symbol, &period).await;
    if data.is_empty() {
        return Err(ApiError::NotFound(format!("No data found for {symbol}")));
    }

    Ok(Json(HistoryResponse {
        symbol,
        period,
        data,
    }))
}
