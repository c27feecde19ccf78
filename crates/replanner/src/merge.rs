use planner::{SessionSlot, WeekPlan};

/// Carry completed and skipped sessions from a superseded plan into a
/// freshly regenerated one, so a forced regeneration never erases what
/// already happened. Slot collisions resolve in favor of history.
pub fn merge_preserved(old_plan: &WeekPlan, new_plan: &WeekPlan) -> WeekPlan {
    let mut result = new_plan.clone();

    for old_day in old_plan.days() {
        let finalized: Vec<&SessionSlot> = old_day
            .sessions
            .iter()
            .filter(|s| s.status.is_finalized())
            .collect();
        if finalized.is_empty() {
            continue;
        }
        let Some(target_day) = result.day_mut(old_day.date) else {
            continue;
        };
        for preserved in finalized {
            if let Some(existing) = target_day
                .sessions
                .iter_mut()
                .find(|s| s.slot == preserved.slot)
            {
                *existing = preserved.clone();
            } else {
                target_day.sessions.push(preserved.clone());
            }
        }
        SessionSlot::sort_sessions(&mut target_day.sessions);
        target_day.roll_up_status();
    }

    result.refresh_load_summary();
    result.plan_revision = old_plan.plan_revision.max(new_plan.plan_revision) + 1;
    result
}
