use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of one prescribed exercise within a completed session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub exercise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets_completed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_load_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One session feedback entry, appended to the feedback log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub date: NaiveDate,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// easy | ok | hard | very_hard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_feeling: Option<String>,
    #[serde(default)]
    pub exercise_results: Vec<ExerciseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

const FEELING_LABELS: [&str; 4] = ["easy", "ok", "hard", "very_hard"];

/// Validate a feedback entry. Returns every problem found, not just the
/// first, so the client can surface all of them at once.
pub fn validate_session_entry(entry: &SessionLogEntry) -> Vec<String> {
    let mut errors = Vec::new();
    if entry.session_id.is_empty() {
        errors.push("session_id is required".to_string());
    }
    if let Some(duration) = entry.duration_minutes {
        if duration == 0 {
            errors.push("duration_minutes must be at least 1".to_string());
        }
    }
    if let Some(feeling) = &entry.overall_feeling {
        if !FEELING_LABELS.contains(&feeling.as_str()) {
            errors.push(format!("unknown overall_feeling: {feeling}"));
        }
    }
    for (i, result) in entry.exercise_results.iter().enumerate() {
        if result.exercise_id.is_empty() {
            errors.push(format!("exercise_results[{i}].exercise_id is required"));
        }
        if let Some(load) = result.top_load_kg {
            if load < 0.0 {
                errors.push(format!("exercise_results[{i}].top_load_kg must be >= 0"));
            }
        }
    }
    errors
}

/// Current working load per exercise, rolled forward from feedback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingLoadEntry {
    pub exercise_id: String,
    pub load_kg: f64,
    pub updated: NaiveDate,
    #[serde(default)]
    pub sessions_counted: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingLoads {
    #[serde(default)]
    pub entries: Vec<WorkingLoadEntry>,
}

impl WorkingLoads {
    /// Fold a session's exercise results into the working loads: the
    /// latest reported top load wins per exercise.
    pub fn apply_feedback(&mut self, entry: &SessionLogEntry) {
        for result in &entry.exercise_results {
            let Some(load) = result.top_load_kg else {
                continue;
            };
            match self
                .entries
                .iter_mut()
                .find(|e| e.exercise_id == result.exercise_id)
            {
                Some(existing) => {
                    if entry.date >= existing.updated {
                        existing.load_kg = load;
                        existing.updated = entry.date;
                    }
                    existing.sessions_counted += 1;
                }
                None => self.entries.push(WorkingLoadEntry {
                    exercise_id: result.exercise_id.clone(),
                    load_kg: load,
                    updated: entry.date,
                    sessions_counted: 1,
                }),
            }
        }
        self.entries.sort_by(|a, b| a.exercise_id.cmp(&b.exercise_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, load: f64) -> SessionLogEntry {
        SessionLogEntry {
            date: date.parse().unwrap(),
            session_id: "finger_strength_home".to_string(),
            duration_minutes: Some(60),
            overall_feeling: Some("hard".to_string()),
            exercise_results: vec![ExerciseResult {
                exercise_id: "max_hang_20mm".to_string(),
                sets_completed: Some(5),
                top_load_kg: Some(load),
                ..ExerciseResult::default()
            }],
            notes: None,
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert!(validate_session_entry(&entry("2026-03-02", 110.0)).is_empty());
    }

    #[test]
    fn validation_collects_all_problems() {
        let mut bad = entry("2026-03-02", -5.0);
        bad.session_id.clear();
        bad.overall_feeling = Some("brutal".to_string());
        let errors = validate_session_entry(&bad);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn working_loads_keep_the_latest_top_load() {
        let mut loads = WorkingLoads::default();
        loads.apply_feedback(&entry("2026-03-02", 110.0));
        loads.apply_feedback(&entry("2026-03-09", 112.5));
        assert_eq!(loads.entries.len(), 1);
        assert_eq!(loads.entries[0].load_kg, 112.5);
        assert_eq!(loads.entries[0].sessions_counted, 2);

        // A stale backfilled entry never regresses the load
        loads.apply_feedback(&entry("2026-03-01", 90.0));
        assert_eq!(loads.entries[0].load_kg, 112.5);
    }
}
