use crate::AppError;
use crate::routes::AppState;
use crate::state;
use axum::{Json, extract::State};
use chrono::{NaiveDate, Utc};
use macrocycle::Macrocycle;
use serde::{Deserialize, Serialize};
use shared::this_monday;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct MacrocycleRequest {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default = "default_total_weeks")]
    #[validate(range(min = 8, max = 52, message = "total_weeks must be between 8 and 52"))]
    pub total_weeks: u32,
}

fn default_total_weeks() -> u32 {
    12
}

#[derive(Debug, Serialize)]
pub struct MacrocycleResponse {
    pub macrocycle: Macrocycle,
}

/// POST /api/macrocycle/generate — generate a macrocycle and replace
/// the current one wholesale. Cached weeks become stale and are dropped.
pub async fn generate(
    State(app): State<AppState>,
    Json(req): Json<MacrocycleRequest>,
) -> Result<Json<MacrocycleResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;

    if user_state.goal.is_empty() {
        return Err(AppError::Validation(
            "No goal in state — complete onboarding first".to_string(),
        ));
    }
    let profile = user_state.assessment.profile.ok_or_else(|| {
        AppError::Validation("No assessment profile — run assessment first".to_string())
    })?;

    let today = Utc::now().date_naive();
    if let Some(deadline) = user_state.goal.deadline {
        if deadline < today {
            return Err(AppError::BadRequest(
                "Goal deadline is in the past. Please update your goal with a future date."
                    .to_string(),
            ));
        }
    }

    let start_date = req.start_date.unwrap_or_else(|| this_monday(today));
    let macrocycle = macrocycle::generate(
        &user_state.goal,
        &profile,
        &user_state.trips,
        start_date,
        req.total_weeks,
        Utc::now(),
    )?;

    user_state.macrocycle = Some(macrocycle.clone());
    user_state.invalidate_week_cache();
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(MacrocycleResponse { macrocycle }))
}
