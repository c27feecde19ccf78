use assessment::AssessmentProfile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Intensity;
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// Periodization phases, in macrocycle order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseId {
    Base,
    StrengthPower,
    PowerEndurance,
    Performance,
    Deload,
}

/// Training domains a phase distributes its emphasis across.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    FingerStrength,
    PullingStrength,
    PowerEndurance,
    VolumeClimbing,
    Technique,
    CorePrehab,
}

pub type DomainWeights = BTreeMap<Domain, f64>;

/// A planned outdoor climbing trip. The five days before the start date
/// form a deload window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PretripDeload {
    pub trip_name: String,
    pub trip_start: NaiveDate,
    pub deload_from: NaiveDate,
}

/// A contiguous span of weeks sharing an intensity cap and domain emphasis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase_id: PhaseId,
    pub phase_name: String,
    /// 1-based absolute week numbers, inclusive.
    pub start_week: u32,
    pub end_week: u32,
    pub duration_weeks: u32,
    pub energy_system: String,
    pub domain_weights: DomainWeights,
    pub session_pool: Vec<String>,
    pub intensity_cap: Intensity,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pretrip_deload: Vec<PretripDeload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// A complete periodized training plan. Replaced wholesale on explicit
/// regeneration; phase durations always sum to `total_weeks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macrocycle {
    pub macrocycle_version: String,
    pub generated_at: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub goal_snapshot: GoalSnapshot,
    pub assessment_snapshot: AssessmentProfile,
    pub total_weeks: u32,
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
