use catalog::SessionTags;
use chrono::NaiveDate;
use macrocycle::{DomainWeights, PhaseId};
use serde::{Deserialize, Serialize};
use shared::{DayStatus, Intensity, Location, Slot, SlotStatus, Weekday};

/// One scheduled occurrence of a catalog session on a date/slot/location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSlot {
    pub slot: Slot,
    pub session_id: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<PhaseId>,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_load_score: Option<u32>,
    #[serde(default)]
    pub status: SlotStatus,
    #[serde(default)]
    pub tags: SessionTags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints_applied: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explain: Vec<String>,
}

impl SessionSlot {
    /// Canonical within-day ordering: slot, then session id.
    pub fn sort_sessions(sessions: &mut [SessionSlot]) {
        sessions.sort_by(|a, b| {
            a.slot
                .cmp(&b.slot)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub weekday: Weekday,
    #[serde(default)]
    pub status: DayStatus,
    #[serde(default)]
    pub sessions: Vec<SessionSlot>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pretrip_deload: bool,
}

impl DayPlan {
    /// Recompute the day status from its sessions per the roll-up rule.
    pub fn roll_up_status(&mut self) {
        self.status = DayStatus::roll_up(self.sessions.iter().map(|s| s.status));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekTargets {
    pub hard_days: u32,
    pub finger_days: u32,
    pub deload_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGroup {
    pub week_index: u32,
    pub phase: PhaseId,
    pub targets: WeekTargets,
    pub days: Vec<DayPlan>,
}

/// The phase/preference context a plan was materialized under, carried in
/// the document so replanning can stay consistent with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanContext {
    pub phase_id: PhaseId,
    pub domain_weights: DomainWeights,
    pub intensity_cap: Intensity,
    pub allowed_locations: Vec<Location>,
    pub hard_cap_per_week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gym_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLoadSummary {
    pub total_load: u32,
    pub hard_days_count: u32,
    pub recovery_days_count: u32,
}

/// Audit trail entry for a replanning mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adaptation {
    Event {
        event: serde_json::Value,
    },
    DayOverride {
        reference_date: NaiveDate,
        target_date: NaiveDate,
        intent: String,
    },
    QuickAdd {
        target_date: NaiveDate,
        session_id: String,
        slot: Slot,
    },
    PhaseMismatchWarning {
        requested_phase: PhaseId,
        current_phase: PhaseId,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningPrefs {
    #[serde(default = "default_hard_cap")]
    pub hard_day_cap_per_week: u32,
    #[serde(default = "default_target_days")]
    pub target_training_days_per_week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gym_id: Option<String>,
}

impl Default for PlanningPrefs {
    fn default() -> Self {
        PlanningPrefs {
            hard_day_cap_per_week: default_hard_cap(),
            target_training_days_per_week: default_target_days(),
            default_gym_id: None,
        }
    }
}

fn default_hard_cap() -> u32 {
    3
}

fn default_target_days() -> u32 {
    4
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub gym_id: String,
    #[serde(default)]
    pub name: String,
    /// Lower is preferred when no gym is pinned.
    #[serde(default = "default_gym_priority")]
    pub priority: u32,
    #[serde(default)]
    pub equipment: Vec<String>,
}

fn default_gym_priority() -> u32 {
    999
}

/// The materialized, mutable schedule for one week. Exchanged whole with
/// clients: every mutation submits the full document and receives a full
/// replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub plan_version: String,
    pub generated_at: String,
    pub start_date: NaiveDate,
    pub profile_snapshot: PlanContext,
    pub weekly_load_summary: WeeklyLoadSummary,
    pub weeks: Vec<WeekGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adaptations: Vec<Adaptation>,
    #[serde(default = "default_revision")]
    pub plan_revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl WeekPlan {
    pub fn days(&self) -> impl Iterator<Item = &DayPlan> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn days_mut(&mut self) -> impl Iterator<Item = &mut DayPlan> {
        self.weeks.iter_mut().flat_map(|w| w.days.iter_mut())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.days().find(|d| d.date == date)
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayPlan> {
        self.days_mut().find(|d| d.date == date)
    }

    /// Recompute the weekly load summary from current sessions.
    pub fn refresh_load_summary(&mut self) {
        let mut summary = WeeklyLoadSummary::default();
        for day in self.weeks.iter().flat_map(|w| w.days.iter()) {
            for session in &day.sessions {
                summary.total_load += session.estimated_load_score.unwrap_or(0);
            }
            if day.sessions.iter().any(|s| s.tags.hard) {
                summary.hard_days_count += 1;
            }
            if day.sessions.is_empty()
                || day.sessions.iter().all(|s| s.intensity == Intensity::Low)
            {
                summary.recovery_days_count += 1;
            }
        }
        self.weekly_load_summary = summary;
    }
}
