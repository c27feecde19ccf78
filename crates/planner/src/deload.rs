use crate::types::{WeekPlan, WeekTargets};
use macrocycle::PhaseId;

/// Transform a week plan into a deload week: hard sessions are dropped,
/// at most three sessions survive, volume targets halve.
pub fn apply_deload_week(plan: &mut WeekPlan) {
    for week in &mut plan.weeks {
        let mut kept = 0usize;
        for day in &mut week.days {
            day.sessions.retain(|session| {
                if kept >= 3 || session.tags.hard {
                    return false;
                }
                kept += 1;
                true
            });
            day.roll_up_status();
        }
        week.phase = PhaseId::Deload;
        week.targets = WeekTargets {
            hard_days: 0,
            finger_days: 0,
            deload_factor: 0.5,
        };
    }
    plan.refresh_load_summary();
}
