use crate::AppError;
use crate::routes::AppState;
use crate::state;
use assessment::{AssessmentInput, AssessmentProfile, Goal, compute_profile};
use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub assessment: Option<AssessmentInput>,
    #[serde(default)]
    pub goal: Option<Goal>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub profile: AssessmentProfile,
}

/// POST /api/assessment/compute — recompute the 6-axis profile and save
/// it into the state document.
pub async fn compute(
    State(app): State<AppState>,
    Json(req): Json<AssessmentRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;

    let input = req.assessment.unwrap_or_else(|| user_state.assessment.input.clone());
    let goal = req.goal.unwrap_or_else(|| user_state.goal.clone());
    if goal.is_empty() {
        return Err(AppError::Validation(
            "No goal provided and none in state".to_string(),
        ));
    }

    let profile = compute_profile(&input, &goal)?;

    user_state.assessment.input = input;
    user_state.assessment.profile = Some(profile);
    user_state.assessment.last_assessed = Some(Utc::now().date_naive());
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(AssessmentResponse { profile }))
}
