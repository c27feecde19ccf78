use crate::AppError;
use crate::routes::AppState;
use crate::state::{self, UserState};
use axum::{Json, extract::State};
use serde_json::json;

/// GET /api/state — the full state document.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<UserState>, AppError> {
    Ok(Json(state::read(&app.read_pool).await?))
}

/// PUT /api/state — deep-merge a patch into the document.
pub async fn put_state(
    State(app): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<UserState>, AppError> {
    let mut tx = app.write_pool.begin().await?;
    let current = state::load(&mut tx).await?;

    let mut merged = serde_json::to_value(&current)?;
    state::deep_merge(&mut merged, patch);
    let mut updated: UserState = serde_json::from_value(merged)
        .map_err(|e| AppError::Validation(format!("Patch produced an invalid state: {e}")))?;

    // Plan inputs may have changed; cached weeks are no longer trustworthy.
    if updated.availability != current.availability
        || updated.planning_prefs != current.planning_prefs
        || updated.equipment != current.equipment
        || updated.trips != current.trips
    {
        updated.invalidate_week_cache();
    }

    state::save(&mut tx, &updated).await?;
    tx.commit().await?;
    Ok(Json(updated))
}

/// DELETE /api/state — reset to the empty template.
pub async fn delete_state(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reset = UserState::default();
    let mut tx = app.write_pool.begin().await?;
    state::save(&mut tx, &reset).await?;
    tx.commit().await?;
    tracing::warn!("User state reset to empty template");
    Ok(Json(json!({ "status": "reset", "state": reset })))
}
