use crate::feedback::SessionLogEntry;
use crate::outdoor::OutdoorSessionEntry;
use chrono::{Datelike, Days, NaiveDate};
use planner::WeekPlan;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub report_type: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub planned_sessions: usize,
    pub completed_sessions: usize,
    pub adherence_pct: f64,
    pub total_indoor_minutes: u32,
    pub total_outdoor_minutes: u32,
    pub session_types: BTreeMap<String, usize>,
    pub outdoor_sessions: usize,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub report_type: String,
    pub month: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_indoor_sessions: usize,
    pub total_outdoor_sessions: usize,
    pub avg_sessions_per_week: f64,
    pub weekly_session_counts: Vec<usize>,
    pub total_indoor_minutes: u32,
    pub total_outdoor_minutes: u32,
    pub feedback_summary: BTreeMap<String, usize>,
    pub suggestions: Vec<String>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Weekly adherence report: what the plan asked for versus what the
/// feedback log says happened.
pub fn weekly_report(
    plan: Option<&WeekPlan>,
    indoor: &[SessionLogEntry],
    outdoor: &[OutdoorSessionEntry],
    week_start: NaiveDate,
) -> WeeklyReport {
    let week_end = week_start + Days::new(6);
    let in_week = |d: NaiveDate| d >= week_start && d <= week_end;

    let indoor: Vec<&SessionLogEntry> = indoor.iter().filter(|e| in_week(e.date)).collect();
    let outdoor: Vec<&OutdoorSessionEntry> = outdoor.iter().filter(|e| in_week(e.date)).collect();

    let planned_sessions = plan
        .map(|p| {
            p.days()
                .filter(|d| in_week(d.date))
                .map(|d| d.sessions.len())
                .sum()
        })
        .unwrap_or(0);
    let completed_sessions = indoor.len();
    let adherence_pct = if planned_sessions > 0 {
        round1(completed_sessions as f64 / planned_sessions as f64 * 100.0)
    } else {
        0.0
    };

    let mut session_types = BTreeMap::new();
    for entry in &indoor {
        *session_types.entry(entry.session_id.clone()).or_insert(0) += 1;
    }

    let mut highlights = Vec::new();
    if adherence_pct >= 90.0 {
        highlights.push("Excellent adherence this week!".to_string());
    } else if adherence_pct >= 70.0 {
        highlights.push("Good training consistency.".to_string());
    }
    if !outdoor.is_empty() {
        highlights.push(format!("{} outdoor session(s) logged.", outdoor.len()));
    }

    WeeklyReport {
        report_type: "weekly".to_string(),
        week_start,
        week_end,
        planned_sessions,
        completed_sessions,
        adherence_pct,
        total_indoor_minutes: indoor.iter().filter_map(|e| e.duration_minutes).sum(),
        total_outdoor_minutes: outdoor.iter().map(|e| e.duration_minutes).sum(),
        session_types,
        outdoor_sessions: outdoor.len(),
        highlights,
    }
}

/// First and last day of a `YYYY-MM` month, or None for garbage input.
pub fn month_bounds(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let start: NaiveDate = format!("{month}-01").parse().ok()?;
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)?
    };
    Some((start, next_month - Days::new(1)))
}

pub fn monthly_report(
    indoor: &[SessionLogEntry],
    outdoor: &[OutdoorSessionEntry],
    month: &str,
    start: NaiveDate,
    end: NaiveDate,
    target_days_per_week: u32,
) -> MonthlyReport {
    let in_month = |d: NaiveDate| d >= start && d <= end;
    let indoor: Vec<&SessionLogEntry> = indoor.iter().filter(|e| in_month(e.date)).collect();
    let outdoor: Vec<&OutdoorSessionEntry> = outdoor.iter().filter(|e| in_month(e.date)).collect();

    let total_weeks = ((end - start).num_days() / 7 + 1) as usize;
    let mut weekly_session_counts = vec![0usize; total_weeks];
    for entry in &indoor {
        let week_idx = (((entry.date - start).num_days() / 7) as usize).min(total_weeks - 1);
        weekly_session_counts[week_idx] += 1;
    }
    let avg_sessions_per_week =
        round1(weekly_session_counts.iter().sum::<usize>() as f64 / total_weeks.max(1) as f64);

    let mut feedback_summary = BTreeMap::new();
    for entry in &indoor {
        let label = entry.overall_feeling.clone().unwrap_or_else(|| "ok".to_string());
        *feedback_summary.entry(label).or_insert(0) += 1;
    }

    let mut suggestions = Vec::new();
    if target_days_per_week > 0 && avg_sessions_per_week / (target_days_per_week as f64) < 0.7 {
        suggestions.push(
            "Training adherence is below 70%. Consider adjusting your availability or reducing target days."
                .to_string(),
        );
    }
    if outdoor.is_empty() {
        suggestions.push(
            "No outdoor sessions this month. Consider scheduling an outdoor day to apply gym gains."
                .to_string(),
        );
    }
    let technique_count = indoor
        .iter()
        .filter(|e| e.session_id.contains("technique"))
        .count();
    if technique_count == 0 && indoor.len() >= 4 {
        suggestions.push(
            "No technique-focused sessions detected. Adding movement quality work can accelerate progress."
                .to_string(),
        );
    }
    suggestions.truncate(3);

    MonthlyReport {
        report_type: "monthly".to_string(),
        month: month.to_string(),
        period_start: start,
        period_end: end,
        total_indoor_sessions: indoor.len(),
        total_outdoor_sessions: outdoor.len(),
        avg_sessions_per_week,
        weekly_session_counts,
        total_indoor_minutes: indoor.iter().filter_map(|e| e.duration_minutes).sum(),
        total_outdoor_minutes: outdoor.iter().map(|e| e.duration_minutes).sum(),
        feedback_summary,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indoor(date: &str, session_id: &str, minutes: u32, feeling: &str) -> SessionLogEntry {
        SessionLogEntry {
            date: date.parse().unwrap(),
            session_id: session_id.to_string(),
            duration_minutes: Some(minutes),
            overall_feeling: Some(feeling.to_string()),
            ..SessionLogEntry::default()
        }
    }

    #[test]
    fn month_bounds_handle_year_end() {
        let (start, end) = month_bounds("2026-12").unwrap();
        assert_eq!(start, "2026-12-01".parse::<NaiveDate>().unwrap());
        assert_eq!(end, "2026-12-31".parse::<NaiveDate>().unwrap());
        assert!(month_bounds("not-a-month").is_none());
    }

    #[test]
    fn weekly_report_without_a_plan_reports_zero_adherence() {
        let report = weekly_report(None, &[], &[], "2026-03-02".parse().unwrap());
        assert_eq!(report.planned_sessions, 0);
        assert_eq!(report.adherence_pct, 0.0);
        assert!(report.highlights.is_empty());
    }

    #[test]
    fn weekly_report_counts_only_entries_in_range() {
        let entries = vec![
            indoor("2026-03-02", "technique_focus_gym", 90, "ok"),
            indoor("2026-03-04", "finger_strength_home", 60, "hard"),
            indoor("2026-03-12", "yoga_recovery", 30, "easy"),
        ];
        let report = weekly_report(None, &entries, &[], "2026-03-02".parse().unwrap());
        assert_eq!(report.completed_sessions, 2);
        assert_eq!(report.total_indoor_minutes, 150);
        assert_eq!(report.session_types.len(), 2);
    }

    #[test]
    fn monthly_report_buckets_weeks_and_suggests() {
        let entries = vec![
            indoor("2026-03-02", "finger_strength_home", 60, "hard"),
            indoor("2026-03-03", "strength_long", 90, "hard"),
            indoor("2026-03-10", "power_endurance_gym", 75, "very_hard"),
            indoor("2026-03-24", "endurance_aerobic_gym", 80, "ok"),
        ];
        let (start, end) = month_bounds("2026-03").unwrap();
        let report = monthly_report(&entries, &[], "2026-03", start, end, 4);

        assert_eq!(report.total_indoor_sessions, 4);
        assert_eq!(report.weekly_session_counts[0], 2);
        assert_eq!(report.feedback_summary["hard"], 2);
        // Low adherence, no outdoor days, no technique work
        assert_eq!(report.suggestions.len(), 3);
    }
}
