use chrono::NaiveDate;
use catalog::{SessionTags, session_meta};
use planner::{SessionSlot, WeekPlan};
use shared::SlotStatus;

fn downshift(session: &mut SessionSlot, constraint: &str, reason: &str) {
    let meta = session_meta("regeneration_easy");
    session.session_id = "regeneration_easy".to_string();
    session.intensity = meta.intensity;
    session.estimated_load_score = Some(meta.intensity.estimated_load());
    session.tags = SessionTags {
        hard: false,
        finger: false,
    };
    session.constraints_applied = vec![constraint.to_string()];
    session.explain = vec![reason.to_string(), "deterministic downshift".to_string()];
}

/// After structural replanning, downshift finger sessions that ended up
/// on adjacent days. Completed sessions are historical facts and are
/// left alone.
fn enforce_finger_spacing(plan: &mut WeekPlan) {
    for week in &mut plan.weeks {
        let mut last_finger_date: Option<NaiveDate> = None;
        for day in &mut week.days {
            let has_finger = day
                .sessions
                .iter()
                .any(|s| s.tags.finger && s.status != SlotStatus::Done);
            if has_finger {
                if let Some(last) = last_finger_date {
                    if (day.date - last).num_days() <= 1 {
                        for session in &mut day.sessions {
                            if session.tags.finger && session.status != SlotStatus::Done {
                                downshift(
                                    session,
                                    "finger_spacing_downshift",
                                    "no consecutive finger days",
                                );
                            }
                        }
                        continue;
                    }
                }
                last_finger_date = Some(day.date);
            }
        }
    }
}

/// Downshift hard sessions on the latest days once the weekly hard-day
/// cap is exceeded.
fn enforce_hard_cap(plan: &mut WeekPlan) {
    let cap = plan.profile_snapshot.hard_cap_per_week as usize;
    for week in &mut plan.weeks {
        let hard_days: Vec<usize> = week
            .days
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                d.sessions
                    .iter()
                    .any(|s| s.tags.hard && s.status != SlotStatus::Done)
            })
            .map(|(i, _)| i)
            .collect();
        if hard_days.len() <= cap {
            continue;
        }
        for day_idx in hard_days[cap..].iter().rev() {
            for session in &mut week.days[*day_idx].sessions {
                if session.tags.hard && session.status != SlotStatus::Done {
                    downshift(
                        session,
                        "hard_cap_downshift",
                        "hard cap exceeded after replanning",
                    );
                }
            }
        }
    }
}

pub fn reconcile(plan: &mut WeekPlan) {
    enforce_finger_spacing(plan);
    enforce_hard_cap(plan);
}
