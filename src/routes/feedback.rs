use crate::AppError;
use crate::routes::AppState;
use crate::state;
use axum::{Json, extract::State};
use logbook::{SessionLogEntry, append_feedback};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub log_entry: SessionLogEntry,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "done".to_string()
}

/// POST /api/feedback — append a session log entry and roll its loads
/// into the working-load table. The client treats this as best-effort;
/// the server still validates and reports problems.
pub async fn post_feedback(
    State(app): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    append_feedback(&app.write_pool, &req.log_entry).await?;

    if req.status == "done" {
        let mut tx = app.write_pool.begin().await?;
        let mut user_state = state::load(&mut tx).await?;
        user_state.working_loads.apply_feedback(&req.log_entry);
        state::save(&mut tx, &user_state).await?;
        tx.commit().await?;
    }

    Ok(Json(json!({ "status": "ok" })))
}
