use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::predictor::{generate_prediction, Predictor};
use crate::types::{PredictionResponse, RequestParams};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    model_loaded: bool,
    timestamp: DateTime<Utc>,
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Catch prediction service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/v1/health",
            "predict": "/api/v1/predict (POST)",
        },
    }))
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        model_loaded: state.predictor.model_loaded(),
        timestamp: Utc::now(),
    })
}

async fn predict(
    State(state): State<AppState>,
    params: Result<Json<RequestParams>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(params) = params?;
    tracing::info!("received prediction request for species: {}", params.species);
    let request = params.validate()?;
    let response = generate_prediction(state.predictor.clone(), request).await?;
    Ok(Json(response))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health))
        .route("/api/v1/predict", post(predict))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
