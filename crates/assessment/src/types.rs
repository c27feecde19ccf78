use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Self-reported weaknesses offered during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Weakness {
    PumpTooEarly,
    FingersGiveOut,
    CantHoldHardMoves,
    TechniqueErrors,
    CantReadRoutes,
    CantManageRests,
    LackPower,
    InjuryProne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Discipline {
    Lead,
    Boulder,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<Discipline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    pub fn is_empty(&self) -> bool {
        self.target_grade.is_none() && self.current_grade.is_none() && self.deadline.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climbing_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_years: Option<u32>,
}

/// Best redpoint / onsight grades per discipline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_max_rp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_max_os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boulder_max_rp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boulder_max_os: Option<String>,
}

/// Optional strength test results. Totals include bodyweight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hang_20mm_5s_total_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_pullup_1rm_total_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeater_7_3_max_sets: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfEval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_weakness: Option<Weakness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_weakness: Option<Weakness>,
}

/// Raw onboarding assessment data the profile is computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    #[serde(default)]
    pub body: BodyMetrics,
    #[serde(default)]
    pub experience: Experience,
    #[serde(default)]
    pub grades: GradeHistory,
    #[serde(default)]
    pub tests: TestResults,
    #[serde(default)]
    pub self_eval: SelfEval,
}

/// Six normalized axis scores, each 0-100. Immutable snapshot — always
/// recomputed wholesale, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentProfile {
    pub finger_strength: u8,
    pub pulling_strength: u8,
    pub power_endurance: u8,
    pub technique: u8,
    pub endurance: u8,
    pub body_composition: u8,
}

impl AssessmentProfile {
    /// Axis scores relevant to weakness detection, paired with their names.
    pub fn trainable_axes(&self) -> [(&'static str, u8); 5] {
        [
            ("power_endurance", self.power_endurance),
            ("endurance", self.endurance),
            ("finger_strength", self.finger_strength),
            ("pulling_strength", self.pulling_strength),
            ("technique", self.technique),
        ]
    }
}
