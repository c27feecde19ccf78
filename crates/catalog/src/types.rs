use serde::{Deserialize, Serialize};
use shared::Location;
use std::collections::BTreeMap;

/// Free-form prescription parameters (sets, reps, load_kg, rest_s, tempo,
/// intensity percentages, notes). Kept as a sorted map so merged output is
/// deterministic.
pub type Prescription = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub exercise_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Roles this exercise can fill in a block (main, assistant, warmup...).
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
    /// Movement pattern, used to group interchangeable exercises.
    #[serde(default)]
    pub pattern: Vec<String>,
    #[serde(default)]
    pub location_allowed: Vec<Location>,
    /// All of these must be available.
    #[serde(default)]
    pub equipment_required: Vec<String>,
    /// At least one of these must be available (when non-empty).
    #[serde(default)]
    pub equipment_required_any: Vec<String>,
    #[serde(default)]
    pub defaults: Prescription,
    #[serde(default)]
    pub attributes: Prescription,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTags {
    #[serde(default)]
    pub hard: bool,
    #[serde(default)]
    pub finger: bool,
}

/// One block of a session definition: either instruction-only, or a
/// selection spec the resolver turns into a concrete exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    pub block_id: String,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Pin a specific exercise, bypassing selection filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
    #[serde(default, skip_serializing_if = "Prescription::is_empty")]
    pub prescription: Prescription,
    #[serde(default, skip_serializing_if = "Prescription::is_empty")]
    pub instructions: Prescription,
}

impl BlockDef {
    pub fn is_instruction_only(&self) -> bool {
        self.mode.as_deref() == Some("instruction_only")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDef {
    pub session_id: String,
    #[serde(default)]
    pub session_name: String,
    #[serde(default)]
    pub session_type: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub tags: SessionTags,
    pub blocks: Vec<BlockDef>,
}

fn default_version() -> String {
    "v1".to_string()
}

/// Catalog listing entry (id + metadata, not the full body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub tags: SessionTags,
}

/// Per-exercise load override from user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum LoadOverride {
    AbsoluteLoadKg(f64),
    DeltaKg(f64),
    Multiplier(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HangboardBaseline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_id: Option<String>,
    #[serde(default = "default_edge_mm")]
    pub edge_mm: u32,
    #[serde(default = "default_grip")]
    pub grip: String,
    #[serde(default = "default_hang_seconds")]
    pub hang_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_load_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
}

fn default_edge_mm() -> u32 {
    20
}

fn default_grip() -> String {
    "half_crimp".to_string()
}

fn default_hang_seconds() -> u32 {
    5
}

/// Context a session is resolved in. Resolution is a pure function of
/// (session definition, this context).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<String>,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodyweight_kg: Option<f64>,
    #[serde(default)]
    pub hangboard_baselines: Vec<HangboardBaseline>,
    #[serde(default)]
    pub load_overrides: BTreeMap<String, LoadOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTrace {
    pub counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_filter_applied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedExercise {
    pub exercise_id: String,
    pub prescription: Prescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBlock {
    pub block_uid: String,
    pub block_id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    /// selected | skipped
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Prescription::is_empty")]
    pub instructions: Prescription,
    pub selected_exercises: Vec<SelectedExercise>,
    pub filter_trace: SelectionTrace,
}

/// Target-load suggestion for max hangs, derived from a hangboard
/// baseline and the prescribed intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxHangSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_id: Option<String>,
    pub intensity_pct_of_total_load: f64,
    pub target_total_load_kg: f64,
    pub added_weight_kg: f64,
    pub assistance_kg: f64,
    pub based_on_max_total_load_kg: f64,
    pub based_on_bodyweight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInstance {
    pub instance_id: String,
    pub exercise_id: String,
    pub prescription: Prescription,
    pub block_uid: String,
    pub picked_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested: Option<MaxHangSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedContext {
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<String>,
    pub available_equipment: Vec<String>,
}

/// Read-only expansion of a session for a specific context. Not persisted
/// inside a week plan; the server re-resolves when the context changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSession {
    pub resolver_version: String,
    pub session_id: String,
    pub session_version: String,
    pub context: ResolvedContext,
    pub blocks: Vec<ResolvedBlock>,
    pub exercise_instances: Vec<ExerciseInstance>,
    /// success | failed
    pub resolution_status: String,
}
