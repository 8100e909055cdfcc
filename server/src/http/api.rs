use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use floorboard_common::HEALTH_ROUTE;
use serde_json::json;
use tracing::debug;

use crate::app::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route(HEALTH_ROUTE, get(health))
        .route("/server-info", get(server_info))
        .route("/floors", get(list_floors))
        .route("/floors/{id}", get(get_floor))
        .route("/display-defaults", get(display_defaults))
}

/// Cheap liveness check used by clients probing for the server.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// The endpoint tuple resolved at boot.
pub(crate) async fn server_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.endpoint.as_ref().clone())
}

/// All floors in display order.
async fn list_floors(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data_rx.borrow().clone();
    Json(data.floors.clone())
}

async fn get_floor(Path(id): Path<u32>, State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data_rx.borrow().clone();
    match data.floors.iter().find(|floor| floor.id == id) {
        Some(floor) => Json(floor.clone()).into_response(),
        None => {
            debug!(id, "Requested unknown floor");
            (StatusCode::NOT_FOUND, format!("No floor with id {id}")).into_response()
        }
    }
}

/// Display settings for displays whose shared storage was never written.
async fn display_defaults(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data_rx.borrow().clone();
    Json(data.display.unwrap_or_default())
}
