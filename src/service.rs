//! HTTP surface: five JSON routes over the shared model store.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::error::PredictorError;
use crate::store::ModelStore;
use crate::types::{
    EtaRequest, EtaResponse, HealthResponse, ModelStatus, OccupancyRequest, OccupancyResponse,
};

pub fn router(store: Arc<ModelStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict/eta", post(predict_eta))
        .route("/predict/occupancy", post(predict_occupancy))
        .route("/models/status", get(models_status))
        .route("/models/reload", post(reload_models))
        .with_state(store)
}

async fn health(State(store): State<Arc<ModelStore>>) -> Json<HealthResponse> {
    Json(store.health())
}

async fn predict_eta(
    State(store): State<Arc<ModelStore>>,
    Json(req): Json<EtaRequest>,
) -> Result<Json<EtaResponse>, PredictorError> {
    store.predict_eta(&req).map(Json)
}

async fn predict_occupancy(
    State(store): State<Arc<ModelStore>>,
    Json(req): Json<OccupancyRequest>,
) -> Result<Json<OccupancyResponse>, PredictorError> {
    store.predict_occupancy(&req).map(Json)
}

async fn models_status(State(store): State<Arc<ModelStore>>) -> Json<ModelStatus> {
    Json(store.status())
}

async fn reload_models(
    State(store): State<Arc<ModelStore>>,
) -> Result<Json<Value>, PredictorError> {
    store.reload().map_err(|e| {
        error!(error = %e, "model reload failed");
        PredictorError::Reload(e.to_string())
    })?;
    Ok(Json(json!({ "message": "Models reloaded successfully" })))
}
