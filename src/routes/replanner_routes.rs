use crate::AppError;
use crate::routes::AppState;
use crate::routes::week::week_index_of;
use crate::state::{self, CachedWeek, UserState};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use planner::WeekPlan;
use replanner::{
    Event, OverrideRequest, QuickAddRequest, Suggestion, apply_events, apply_override, quick_add,
    suggest,
};
use serde::{Deserialize, Serialize};
use shared::Location;
use sqlx::SqliteConnection;

#[derive(Debug, Deserialize)]
pub struct EventsBody {
    pub events: Vec<Event>,
    pub week_plan: WeekPlan,
}

#[derive(Debug, Deserialize)]
pub struct OverrideBody {
    #[serde(flatten)]
    pub request: OverrideRequest,
    pub week_plan: WeekPlan,
}

#[derive(Debug, Deserialize)]
pub struct QuickAddBody {
    #[serde(flatten)]
    pub request: QuickAddRequest,
    pub week_plan: WeekPlan,
}

#[derive(Debug, Deserialize)]
pub struct SuggestBody {
    pub target_date: NaiveDate,
    #[serde(default = "default_location")]
    pub location: Location,
    pub week_plan: WeekPlan,
}

fn default_location() -> Location {
    Location::Gym
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub week_plan: WeekPlan,
}

#[derive(Debug, Serialize)]
pub struct QuickAddResponse {
    pub week_plan: WeekPlan,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Persist a replanned document as the authoritative copy of its week,
/// so the next unforced GET returns it instead of re-materializing.
async fn persist_plan(
    conn: &mut SqliteConnection,
    user_state: &mut UserState,
    plan: &WeekPlan,
) -> Result<(), AppError> {
    let Some(macrocycle) = &user_state.macrocycle else {
        return Ok(());
    };
    let Some(week_num) = week_index_of(macrocycle, plan.start_date) else {
        return Ok(());
    };
    user_state.cached_weeks.insert(
        week_num,
        CachedWeek {
            week_num,
            phase_id: plan.profile_snapshot.phase_id,
            week_plan: plan.clone(),
        },
    );
    state::save(conn, user_state).await
}

/// POST /api/replanner/events — apply status/move events to the
/// submitted plan and return the full updated document.
pub async fn events(
    State(app): State<AppState>,
    Json(body): Json<EventsBody>,
) -> Result<Json<PlanResponse>, AppError> {
    let updated = apply_events(&body.week_plan, &body.events)?;

    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;
    persist_plan(&mut tx, &mut user_state, &updated).await?;
    tx.commit().await?;

    Ok(Json(PlanResponse { week_plan: updated }))
}

/// POST /api/replanner/override — replace a single day by intent.
pub async fn override_day(
    State(app): State<AppState>,
    Json(body): Json<OverrideBody>,
) -> Result<Json<PlanResponse>, AppError> {
    let updated = apply_override(&body.week_plan, &body.request)?;

    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;
    persist_plan(&mut tx, &mut user_state, &updated).await?;
    tx.commit().await?;

    Ok(Json(PlanResponse { week_plan: updated }))
}

/// POST /api/replanner/quick-add — append one session; soft constraints
/// come back as warnings.
pub async fn quick_add_session(
    State(app): State<AppState>,
    Json(body): Json<QuickAddBody>,
) -> Result<Json<QuickAddResponse>, AppError> {
    let (updated, warnings) = quick_add(&body.week_plan, &body.request)?;

    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;
    persist_plan(&mut tx, &mut user_state, &updated).await?;
    tx.commit().await?;

    Ok(Json(QuickAddResponse {
        week_plan: updated,
        warnings,
    }))
}

/// POST /api/replanner/suggest — quick-add candidates for a date.
pub async fn suggest_sessions(
    Json(body): Json<SuggestBody>,
) -> Result<Json<SuggestResponse>, AppError> {
    let suggestions = suggest(&body.week_plan, body.target_date, body.location, 3);
    Ok(Json(SuggestResponse { suggestions }))
}
