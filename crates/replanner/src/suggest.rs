use chrono::{Days, NaiveDate};
use catalog::session_meta;
use macrocycle::session_pool;
use planner::WeekPlan;
use serde::{Deserialize, Serialize};
use shared::{Intensity, Location, SlotStatus};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub session_id: String,
    pub intensity: Intensity,
    pub estimated_load_score: u32,
    pub reason: String,
}

/// Up to `max_suggestions` quick-add candidates for a date/location,
/// scored deterministically: same inputs always yield the same list.
pub fn suggest(
    plan: &WeekPlan,
    target_date: NaiveDate,
    location: Location,
    max_suggestions: usize,
) -> Vec<Suggestion> {
    let phase_id = plan.profile_snapshot.phase_id;
    let candidates: Vec<String> = session_pool(phase_id)
        .into_iter()
        .filter(|sid| session_meta(sid).locations.contains(&location))
        .collect();

    // Sessions still pending this week (done/skipped ones free their id)
    let scheduled: BTreeSet<&str> = plan
        .days()
        .flat_map(|d| d.sessions.iter())
        .filter(|s| !s.status.is_finalized())
        .map(|s| s.session_id.as_str())
        .collect();

    let hard_cap = plan.profile_snapshot.hard_cap_per_week;
    let hard_count = plan
        .days()
        .filter(|d| {
            d.sessions
                .iter()
                .any(|s| s.tags.hard && s.status != SlotStatus::Done)
        })
        .count() as u32;

    let finger_adjacent = plan.days().any(|d| {
        d.date != target_date
            && (d.date - target_date).num_days().abs() <= 1
            && d.sessions.iter().any(|s| s.tags.finger)
    });
    let follows_hard = plan
        .day(target_date - Days::new(1))
        .is_some_and(|d| d.sessions.iter().any(|s| s.tags.hard));

    let mut scored: Vec<(i64, String, String)> = Vec::new();
    for sid in candidates {
        let meta = session_meta(&sid);
        let mut score = 0i64;
        let mut reasons: Vec<&str> = Vec::new();

        if !scheduled.contains(sid.as_str()) {
            score += 10;
            reasons.push("adds variety");
        }
        if follows_hard && !meta.hard && meta.intensity <= Intensity::Medium {
            score += 5;
            reasons.push("good after a hard day");
        }
        if meta.hard {
            reasons.push("high intensity");
        }
        if meta.hard && hard_count >= hard_cap {
            score -= 1000;
        }
        if meta.finger && finger_adjacent {
            score -= 1000;
        }

        let reason = if reasons.is_empty() {
            "available".to_string()
        } else {
            reasons.join("; ")
        };
        scored.push((score, sid, reason));
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, session_id, reason)| {
            let meta = session_meta(&session_id);
            Suggestion {
                session_id,
                intensity: meta.intensity,
                estimated_load_score: meta.intensity.estimated_load(),
                reason,
            }
        })
        .collect()
}
