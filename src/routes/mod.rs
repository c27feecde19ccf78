pub mod assessment_routes;
pub mod catalog_routes;
pub mod feedback;
pub mod macrocycle_routes;
pub mod onboarding;
pub mod outdoor;
pub mod replanner_routes;
pub mod reports;
pub mod session;
pub mod state_routes;
pub mod week;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use sqlx::SqlitePool;

/// Shared handler state: a wide read pool and a single-connection write
/// pool whose transactions serialize all read-modify-write operations.
#[derive(Clone)]
pub struct AppState {
    pub read_pool: SqlitePool,
    pub write_pool: SqlitePool,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.read_pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
