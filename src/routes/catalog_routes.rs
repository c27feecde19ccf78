use crate::AppError;
use axum::Json;
use catalog::{Exercise, SessionSummary, list_sessions, load_exercises};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExercisesResponse {
    pub exercises: Vec<Exercise>,
    pub count: usize,
}

/// GET /api/catalog/sessions — session ids and metadata.
pub async fn sessions() -> Result<Json<SessionsResponse>, AppError> {
    let sessions = list_sessions()?;
    let count = sessions.len();
    Ok(Json(SessionsResponse { sessions, count }))
}

/// GET /api/catalog/exercises — the full exercise catalog.
pub async fn exercises() -> Result<Json<ExercisesResponse>, AppError> {
    let exercises = load_exercises()?;
    let count = exercises.len();
    Ok(Json(ExercisesResponse { exercises, count }))
}
