use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use tc_metrics::{compute_aligned_series, compute_metrics};
use tc_types::AlignedSeries;

use crate::error::ApiError;
use crate::schemas::{MetricsRequest, MetricsResponse, PricesRequest};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", post(metrics))
        .route("/prices", post(prices))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;
    let config = req.metrics_config(&state.config.metrics);

    let prices = state.loader.load(&req.tickers(), req.start, req.end).await?;
    let result = compute_metrics(&prices, &req.weight_pairs(), &config)?;

    info!(
        tickers = req.weights.len(),
        status = ?result.status,
        observations = result.observations,
        "metrics computed"
    );
    Ok(Json(MetricsResponse::from(result)))
}

async fn prices(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PricesRequest>, JsonRejection>,
) -> Result<Json<AlignedSeries>, ApiError> {
    let Json(req) = payload?;
    let Some((tickers, start, end)) = req.parts()? else {
        return Ok(Json(AlignedSeries::default()));
    };

    let series = state.loader.load(&tickers, start, end).await?;
    Ok(Json(compute_aligned_series(&series)))
}
