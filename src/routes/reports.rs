use crate::AppError;
use crate::routes::AppState;
use crate::state;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Days, NaiveDate};
use logbook::{
    MonthlyReport, WeeklyReport, load_feedback_range, load_outdoor, monthly_report, month_bounds,
    weekly_report,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// Monday of the requested week.
    pub week_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// YYYY-MM
    pub month: String,
}

/// GET /api/reports/weekly?week_start=YYYY-MM-DD
pub async fn weekly(
    State(app): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<WeeklyReport>, AppError> {
    let week_start = query.week_start;
    let week_end = week_start + Days::new(6);

    let user_state = state::read(&app.read_pool).await?;
    let plan = user_state
        .cached_weeks
        .values()
        .find(|w| w.week_plan.start_date == week_start)
        .map(|w| &w.week_plan);

    let indoor = load_feedback_range(&app.read_pool, week_start, week_end).await?;
    let outdoor = load_outdoor(&app.read_pool, Some(week_start)).await?;

    Ok(Json(weekly_report(plan, &indoor, &outdoor, week_start)))
}

/// GET /api/reports/monthly?month=YYYY-MM
pub async fn monthly(
    State(app): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyReport>, AppError> {
    let (start, end) = month_bounds(&query.month)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}", query.month)))?;

    let user_state = state::read(&app.read_pool).await?;
    let indoor = load_feedback_range(&app.read_pool, start, end).await?;
    let outdoor = load_outdoor(&app.read_pool, Some(start)).await?;

    Ok(Json(monthly_report(
        &indoor,
        &outdoor,
        &query.month,
        start,
        end,
        user_state.planning_prefs.target_training_days_per_week,
    )))
}
