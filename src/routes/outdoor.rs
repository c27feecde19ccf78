use crate::AppError;
use crate::routes::AppState;
use crate::state;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use logbook::{
    OutdoorSessionEntry, OutdoorSpot, OutdoorStats, append_outdoor, compute_outdoor_stats,
    generate_spot_id, load_outdoor,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SpotCreate {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub discipline: String,
    #[serde(default)]
    pub typical_days: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/outdoor/spots
pub async fn get_spots(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let user_state = state::read(&app.read_pool).await?;
    Ok(Json(json!({ "spots": user_state.outdoor_spots })))
}

/// POST /api/outdoor/spots
pub async fn add_spot(
    State(app): State<AppState>,
    Json(req): Json<SpotCreate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;

    let spot_id = req.id.unwrap_or_else(generate_spot_id);
    if user_state.outdoor_spots.iter().any(|s| s.id == spot_id) {
        return Err(AppError::Conflict(format!(
            "Spot with id '{spot_id}' already exists"
        )));
    }

    let spot = OutdoorSpot {
        id: spot_id,
        name: req.name,
        discipline: req.discipline,
        typical_days: req.typical_days,
        notes: req.notes,
    };
    user_state.outdoor_spots.push(spot.clone());
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(json!({ "status": "ok", "spot": spot })))
}

/// DELETE /api/outdoor/spots/{spot_id}
pub async fn delete_spot(
    State(app): State<AppState>,
    Path(spot_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;

    let before = user_state.outdoor_spots.len();
    user_state.outdoor_spots.retain(|s| s.id != spot_id);
    if user_state.outdoor_spots.len() == before {
        return Err(AppError::NotFound(format!("Spot not found: {spot_id}")));
    }
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(json!({ "status": "deleted", "id": spot_id })))
}

#[derive(Debug, Deserialize)]
pub struct SinceQuery {
    #[serde(default)]
    pub since: Option<NaiveDate>,
}

/// GET /api/outdoor/sessions
pub async fn get_sessions(
    State(app): State<AppState>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sessions = load_outdoor(&app.read_pool, query.since).await?;
    let count = sessions.len();
    Ok(Json(json!({ "sessions": sessions, "count": count })))
}

/// POST /api/outdoor/sessions — validated append-only log.
pub async fn log_session(
    State(app): State<AppState>,
    Json(entry): Json<OutdoorSessionEntry>,
) -> Result<Json<serde_json::Value>, AppError> {
    append_outdoor(&app.write_pool, &entry).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// GET /api/outdoor/stats
pub async fn get_stats(
    State(app): State<AppState>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<OutdoorStats>, AppError> {
    let sessions = load_outdoor(&app.read_pool, query.since).await?;
    Ok(Json(compute_outdoor_stats(&sessions)))
}
