//! HTTP API: route planning and graph health

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use geojson::Feature;
use routewise_core::{AssembledRoute, RouteStep, Waypoint, plan_route};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FindPathRequest {
    /// `[lat, lon]` pairs, the first one is the start
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct FindPathResponse {
    pub success: bool,
    pub route: Vec<[f64; 2]>,
    pub details: Vec<RouteStep>,
    pub total_dist: f64,
}

impl From<AssembledRoute> for FindPathResponse {
    fn from(route: AssembledRoute) -> Self {
        Self {
            success: true,
            route: route.polyline,
            details: route.steps,
            total_dist: route.total_distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub nodes: usize,
    pub edges: usize,
}

pub fn router(state: Arc<AppState>, request_timeout: Duration, max_concurrent: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/find-path", post(find_path))
        .route("/api/find-path/geojson", post(find_path_geojson))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout)
                .layer(GlobalConcurrencyLimitLayer::new(max_concurrent)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn handle_middleware_error(error: BoxError) -> Response {
    if error.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout.into_response()
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {error}")).into_response()
    }
}

/// Snaps, optimizes and assembles on a blocking thread. The planning permit
/// lives inside the job: a request that times out leaves its job running,
/// and the job keeps the slot until it returns.
async fn plan(state: &AppState, points: Vec<[f64; 2]>) -> Result<AssembledRoute, ApiError> {
    let graph = state.graph().await?;
    let options = state.options;
    let waypoints: Vec<Waypoint> = points.into_iter().map(Waypoint::from).collect();

    let permit = state.planning_permit().await?;
    let route = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        plan_route(&graph, &waypoints, &options)
    })
    .await??;
    Ok(route)
}

pub async fn find_path(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FindPathRequest>, JsonRejection>,
) -> Result<Json<FindPathResponse>, ApiError> {
    let Json(request) = body?;
    let route = plan(&state, request.points).await?;
    Ok(Json(route.into()))
}

pub async fn find_path_geojson(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FindPathRequest>, JsonRejection>,
) -> Result<Json<Feature>, ApiError> {
    let Json(request) = body?;
    let route = plan(&state, request.points).await?;
    Ok(Json(route.to_geojson()?))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let graph = state.graph().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        nodes: graph.node_count(),
        edges: graph.edge_count(),
    }))
}
