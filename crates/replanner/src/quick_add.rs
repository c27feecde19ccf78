use crate::ReplanError;
use catalog::{SessionTags, session_meta};
use chrono::{Days, NaiveDate};
use macrocycle::PhaseId;
use planner::{Adaptation, SessionSlot, WeekPlan};
use serde::Deserialize;
use shared::{Location, Slot, SlotStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct QuickAddRequest {
    pub session_id: String,
    pub target_date: NaiveDate,
    #[serde(default = "default_slot")]
    pub slot: Slot,
    #[serde(default = "default_location")]
    pub location: Location,
    #[serde(default)]
    pub phase_id: Option<PhaseId>,
    #[serde(default)]
    pub gym_id: Option<String>,
}

fn default_slot() -> Slot {
    Slot::Evening
}

fn default_location() -> Location {
    Location::Gym
}

/// Append one session to an existing day without touching anything else.
///
/// Soft-constraint by design: exceeding the weekly hard cap, stacking
/// hard days back to back, or breaking finger spacing produce advisory
/// warnings, never a rejection. Only a slot collision is an error.
pub fn quick_add(
    plan: &WeekPlan,
    req: &QuickAddRequest,
) -> Result<(WeekPlan, Vec<String>), ReplanError> {
    let mut updated = plan.clone();
    let meta = session_meta(&req.session_id);
    let effective_phase = req.phase_id.unwrap_or(updated.profile_snapshot.phase_id);
    let default_gym = updated.profile_snapshot.default_gym_id.clone();

    {
        let day = updated
            .day_mut(req.target_date)
            .ok_or(ReplanError::DateNotInPlan(req.target_date))?;
        if day.sessions.iter().any(|s| s.slot == req.slot) {
            return Err(ReplanError::SlotOccupied {
                date: req.target_date,
                slot: req.slot,
            });
        }

        let gym_id = match (req.location, &req.gym_id) {
            (Location::Gym, Some(gym_id)) => Some(gym_id.clone()),
            (Location::Gym, None) => default_gym,
            _ => None,
        };
        day.sessions.push(SessionSlot {
            slot: req.slot,
            session_id: req.session_id.clone(),
            location: req.location,
            gym_id,
            phase_id: Some(effective_phase),
            intensity: meta.intensity,
            estimated_load_score: Some(meta.intensity.estimated_load()),
            status: SlotStatus::Planned,
            tags: SessionTags {
                hard: meta.hard,
                finger: meta.finger,
            },
            constraints_applied: vec!["quick_add".to_string()],
            explain: vec![
                "user quick-add session".to_string(),
                format!("added_session={}", req.session_id),
            ],
        });
        SessionSlot::sort_sessions(&mut day.sessions);
        day.roll_up_status();
    }

    let warnings = collect_warnings(&updated, req.target_date, &meta);

    updated.adaptations.push(Adaptation::QuickAdd {
        target_date: req.target_date,
        session_id: req.session_id.clone(),
        slot: req.slot,
    });
    updated.refresh_load_summary();
    updated.plan_revision += 1;
    Ok((updated, warnings))
}

fn collect_warnings(
    plan: &WeekPlan,
    target_date: NaiveDate,
    meta: &catalog::SessionMeta,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let hard_cap = plan.profile_snapshot.hard_cap_per_week;

    let hard_days = plan
        .days()
        .filter(|d| {
            d.sessions
                .iter()
                .any(|s| s.tags.hard && s.status != SlotStatus::Done)
        })
        .count() as u32;
    if hard_days > hard_cap {
        warnings.push(format!(
            "Hard session count ({hard_days}) exceeds weekly cap ({hard_cap})"
        ));
    }

    if meta.hard {
        let adjacent_hard = plan.days().any(|d| {
            d.date != target_date
                && adjacent(d.date, target_date)
                && d.sessions.iter().any(|s| s.tags.hard)
        });
        if adjacent_hard {
            warnings.push("Hard sessions on consecutive days; consider moving one".to_string());
        }
    }

    if meta.finger {
        let adjacent_finger = plan.days().any(|d| {
            d.date != target_date
                && adjacent(d.date, target_date)
                && d.sessions.iter().any(|s| s.tags.finger)
        });
        if adjacent_finger {
            warnings
                .push("Finger sessions within 48h; fingers recover best with a day off".to_string());
        }
    }

    warnings
}

fn adjacent(a: NaiveDate, b: NaiveDate) -> bool {
    a == b + Days::new(1) || b == a + Days::new(1)
}
