use crate::AppError;
use crate::routes::AppState;
use crate::state::{self, CachedWeek, UserState};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Days, NaiveDate, Utc};
use macrocycle::{Macrocycle, PhaseContext, PhaseId, week_context};
use planner::{MaterializeParams, WeekPlan, materialize};
use replanner::merge_preserved;
use serde::{Deserialize, Serialize};
use shared::Location;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub week_num: u32,
    pub phase_id: PhaseId,
    pub week_plan: WeekPlan,
}

/// The 1-based week index a plan's start date falls on, when it aligns
/// with the macrocycle's week grid.
pub fn week_index_of(macrocycle: &Macrocycle, start_date: NaiveDate) -> Option<u32> {
    let offset_days = (start_date - macrocycle.start_date).num_days();
    if offset_days < 0 || offset_days % 7 != 0 {
        return None;
    }
    let week_num = (offset_days / 7) as u32 + 1;
    (week_num <= macrocycle.total_weeks).then_some(week_num)
}

/// Dates of this week that fall inside a 5-day pre-trip deload window.
fn pretrip_dates_for_week(user_state: &UserState, week_start: NaiveDate) -> Vec<NaiveDate> {
    let week_days: Vec<NaiveDate> = (0..7).map(|i| week_start + Days::new(i)).collect();
    week_days
        .into_iter()
        .filter(|date| {
            user_state.trips.iter().any(|trip| {
                trip.start_date.is_some_and(|trip_start| {
                    *date >= trip_start - Days::new(5) && *date < trip_start
                })
            })
        })
        .collect()
}

pub fn materialize_week(user_state: &UserState, ctx: &PhaseContext) -> WeekPlan {
    let pretrip = pretrip_dates_for_week(user_state, ctx.start_date);
    materialize(&MaterializeParams {
        ctx,
        availability: Some(&user_state.availability),
        allowed_locations: &[Location::Home, Location::Gym],
        prefs: &user_state.planning_prefs,
        gyms: &user_state.equipment.gyms,
        pretrip_dates: &pretrip,
        generated_at: Utc::now(),
    })
}

/// GET /api/week/{week_num}[?force=true] — materialize (or serve the
/// cached) plan for a week. `week_num=0` resolves to the current week.
/// Repeat calls return the same plan until `force` regenerates it; a
/// forced regeneration still carries completed work over.
pub async fn get_week(
    State(app): State<AppState>,
    Path(week_num): Path<u32>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekResponse>, AppError> {
    let mut tx = app.write_pool.begin().await?;
    let mut user_state = state::load(&mut tx).await?;

    let macrocycle = user_state.macrocycle.clone().ok_or_else(|| {
        AppError::Validation("No macrocycle — generate one first".to_string())
    })?;

    let today = Utc::now().date_naive();
    let ctx = week_context(&macrocycle, week_num, today)?;

    if !query.force {
        if let Some(cached) = user_state.cached_weeks.get(&ctx.week_num) {
            let response = WeekResponse {
                week_num: cached.week_num,
                phase_id: cached.phase_id,
                week_plan: cached.week_plan.clone(),
            };
            tx.commit().await?;
            return Ok(Json(response));
        }
    }

    let fresh = materialize_week(&user_state, &ctx);
    let week_plan = match user_state.cached_weeks.get(&ctx.week_num) {
        Some(previous) => merge_preserved(&previous.week_plan, &fresh),
        None => fresh,
    };

    user_state.cached_weeks.insert(
        ctx.week_num,
        CachedWeek {
            week_num: ctx.week_num,
            phase_id: ctx.phase_id,
            week_plan: week_plan.clone(),
        },
    );
    state::save(&mut tx, &user_state).await?;
    tx.commit().await?;

    Ok(Json(WeekResponse {
        week_num: ctx.week_num,
        phase_id: ctx.phase_id,
        week_plan,
    }))
}
