use assessment::{AssessmentInput, AssessmentProfile, Goal};
use catalog::{HangboardBaseline, LoadOverride};
use chrono::NaiveDate;
use logbook::{OutdoorSpot, WorkingLoads};
use macrocycle::{Macrocycle, PhaseId, Trip};
use planner::{Availability, Gym, PlanningPrefs, WeekPlan};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeMap;

use crate::AppError;

pub const SCHEMA_VERSION: &str = "1.5";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Raw assessment data plus the computed profile snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(flatten)]
    pub input: AssessmentInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AssessmentProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_assessed: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub home: Vec<String>,
    #[serde(default)]
    pub gyms: Vec<Gym>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitationDetail {
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limitations {
    #[serde(default)]
    pub active_flags: Vec<String>,
    #[serde(default)]
    pub details: Vec<LimitationDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baselines {
    #[serde(default)]
    pub hangboard: Vec<HangboardBaseline>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOverrides {
    #[serde(default)]
    pub per_exercise: BTreeMap<String, LoadOverride>,
}

/// A materialized week kept server-side so repeat fetches stay stable
/// and replanner results survive the next GET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWeek {
    pub week_num: u32,
    pub phase_id: PhaseId,
    pub week_plan: WeekPlan,
}

/// The whole per-user document. Stored as a single JSON row and
/// replaced wholesale on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub schema_version: String,
    #[serde(default)]
    pub user: UserInfo,
    #[serde(default)]
    pub assessment: AssessmentRecord,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub planning_prefs: PlanningPrefs,
    #[serde(default)]
    pub limitations: Limitations,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub macrocycle: Option<Macrocycle>,
    #[serde(default)]
    pub baselines: Baselines,
    #[serde(default)]
    pub overrides: LoadOverrides,
    #[serde(default)]
    pub working_loads: WorkingLoads,
    #[serde(default)]
    pub bodyweight_kg: Option<f64>,
    #[serde(default)]
    pub outdoor_spots: Vec<OutdoorSpot>,
    #[serde(default)]
    pub cached_weeks: BTreeMap<u32, CachedWeek>,
}

impl Default for UserState {
    fn default() -> Self {
        UserState {
            schema_version: SCHEMA_VERSION.to_string(),
            user: UserInfo::default(),
            assessment: AssessmentRecord::default(),
            goal: Goal::default(),
            availability: Availability::default(),
            equipment: Equipment::default(),
            planning_prefs: PlanningPrefs::default(),
            limitations: Limitations::default(),
            trips: Vec::new(),
            macrocycle: None,
            baselines: Baselines::default(),
            overrides: LoadOverrides::default(),
            working_loads: WorkingLoads::default(),
            bodyweight_kg: None,
            outdoor_spots: Vec::new(),
            cached_weeks: BTreeMap::new(),
        }
    }
}

impl UserState {
    /// Drop every cached week. Call after any change to plan inputs
    /// (macrocycle, availability, preferences).
    pub fn invalidate_week_cache(&mut self) {
        self.cached_weeks.clear();
    }
}

/// Load the state document inside a transaction or connection. A
/// missing row is a fresh install and yields the empty template.
pub async fn load(conn: &mut SqliteConnection) -> Result<UserState, AppError> {
    let row = sqlx::query("SELECT document FROM user_state WHERE id = 1")
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(row) => {
            let raw: String = row.get("document");
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(UserState::default()),
    }
}

pub async fn save(conn: &mut SqliteConnection, state: &UserState) -> Result<(), AppError> {
    let document = serde_json::to_string(state)?;
    sqlx::query(
        "INSERT INTO user_state (id, document, updated_at) VALUES (1, ?1, datetime('now'))
         ON CONFLICT(id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
    )
    .bind(document)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Read-only load for handlers that never write.
pub async fn read(pool: &SqlitePool) -> Result<UserState, AppError> {
    let mut conn = pool.acquire().await?;
    load(&mut conn).await
}

/// Recursively merge `patch` into `base`: objects merge key-wise,
/// everything else is replaced.
pub fn deep_merge(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, patch) => *base_slot = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_template_round_trips() {
        let state = UserState::default();
        let json = serde_json::to_string(&state).unwrap();
        let back: UserState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn deep_merge_merges_objects_and_replaces_leaves() {
        let mut base = serde_json::json!({
            "goal": { "target_grade": "7c", "deadline": "2026-06-01" },
            "trips": [{ "name": "old" }]
        });
        deep_merge(
            &mut base,
            serde_json::json!({
                "goal": { "target_grade": "8a" },
                "trips": [{ "name": "new" }]
            }),
        );
        assert_eq!(base["goal"]["target_grade"], "8a");
        assert_eq!(base["goal"]["deadline"], "2026-06-01");
        assert_eq!(base["trips"][0]["name"], "new");
        assert_eq!(base["trips"].as_array().unwrap().len(), 1);
    }
}
