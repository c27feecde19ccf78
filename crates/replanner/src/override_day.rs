use crate::ReplanError;
use catalog::{SessionTags, session_meta};
use chrono::{Days, NaiveDate};
use macrocycle::PhaseId;
use planner::{Adaptation, SessionSlot, WeekPlan};
use serde::{Deserialize, Serialize};
use shared::{Location, Slot, SlotStatus};
use strum::{Display, EnumString};

/// What the user wants a day to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    Rest,
    Recovery,
    Projecting,
    Strength,
    Endurance,
    PowerEndurance,
    Technique,
}

impl Intent {
    /// The catalog session a non-rest intent resolves to.
    fn session_id(self) -> Option<&'static str> {
        match self {
            Intent::Rest => None,
            Intent::Recovery => Some("yoga_recovery"),
            Intent::Projecting => Some("power_contact_gym"),
            Intent::Strength => Some("strength_long"),
            Intent::Endurance => Some("endurance_aerobic_gym"),
            Intent::PowerEndurance => Some("power_endurance_gym"),
            Intent::Technique => Some("technique_focus_gym"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideRequest {
    pub intent: Intent,
    pub location: Location,
    pub reference_date: NaiveDate,
    /// Defaults to the day after `reference_date`.
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default = "default_slot")]
    pub slot: Slot,
    #[serde(default)]
    pub phase_id: Option<PhaseId>,
    #[serde(default)]
    pub gym_id: Option<String>,
}

fn default_slot() -> Slot {
    Slot::Evening
}

/// Replace one day's sessions according to an intent.
///
/// Contract: exactly one `DayPlan` differs from the input; every other
/// day is returned byte-for-byte unchanged. `rest` empties the day and
/// resets it to planned — a chosen rest day is not a skipped one.
pub fn apply_override(plan: &WeekPlan, req: &OverrideRequest) -> Result<WeekPlan, ReplanError> {
    let mut updated = plan.clone();
    let target = req
        .target_date
        .unwrap_or(req.reference_date + Days::new(1));

    let current_phase = updated.profile_snapshot.phase_id;
    let effective_phase = req.phase_id.unwrap_or(current_phase);

    let default_gym = updated.profile_snapshot.default_gym_id.clone();
    let day = updated
        .day_mut(target)
        .ok_or(ReplanError::DateNotInPlan(target))?;

    match req.intent.session_id() {
        None => {
            day.sessions.clear();
        }
        Some(session_id) => {
            let meta = session_meta(session_id);
            let gym_id = match (req.location, &req.gym_id) {
                (Location::Gym, Some(gym_id)) => Some(gym_id.clone()),
                (Location::Gym, None) => default_gym,
                _ => None,
            };
            day.sessions = vec![SessionSlot {
                slot: req.slot,
                session_id: session_id.to_string(),
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
                constraints_applied: vec!["manual_override".to_string()],
                explain: vec![
                    "user day override applied".to_string(),
                    format!("override_intent={}", req.intent),
                ],
            }];
        }
    }
    day.roll_up_status();

    updated.adaptations.push(Adaptation::DayOverride {
        reference_date: req.reference_date,
        target_date: target,
        intent: req.intent.to_string(),
    });
    if effective_phase != current_phase {
        updated.adaptations.push(Adaptation::PhaseMismatchWarning {
            requested_phase: effective_phase,
            current_phase,
            message: format!(
                "Override session uses phase '{effective_phase}' but current plan phase is '{current_phase}'"
            ),
        });
    }

    updated.refresh_load_summary();
    updated.plan_revision += 1;
    Ok(updated)
}
