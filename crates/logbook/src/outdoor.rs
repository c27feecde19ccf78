use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const OUTDOOR_LOG_VERSION: &str = "outdoor.v1";
const VALID_DISCIPLINES: [&str; 3] = ["lead", "boulder", "both"];

/// Short random spot identifier, `spot_` plus 8 hex chars.
pub fn generate_spot_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("spot_{}", &hex[..8])
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorSpot {
    pub id: String,
    pub name: String,
    pub discipline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_days: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteAttempt {
    /// sent | fell | dogged
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLog {
    pub name: String,
    pub grade: String,
    /// onsight | flash | redpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub attempts: Vec<RouteAttempt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorSessionEntry {
    #[serde(default)]
    pub log_version: String,
    pub date: NaiveDate,
    pub spot_name: String,
    pub discipline: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub routes: Vec<RouteLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn validate_outdoor_entry(entry: &OutdoorSessionEntry) -> Vec<String> {
    let mut errors = Vec::new();
    if entry.log_version != OUTDOOR_LOG_VERSION {
        errors.push(format!(
            "Invalid log_version: {} (expected {OUTDOOR_LOG_VERSION})",
            entry.log_version
        ));
    }
    if !VALID_DISCIPLINES.contains(&entry.discipline.as_str()) {
        errors.push(format!("Invalid discipline: {}", entry.discipline));
    }
    if entry.spot_name.is_empty() {
        errors.push("spot_name is required".to_string());
    }
    if entry.duration_minutes < 1 {
        errors.push(format!(
            "Invalid duration_minutes: {}",
            entry.duration_minutes
        ));
    }
    for (i, route) in entry.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(format!("routes[{i}].name is required"));
        }
        if route.grade.is_empty() {
            errors.push(format!("routes[{i}].grade is required"));
        }
        if route.attempts.is_empty() {
            errors.push(format!("routes[{i}].attempts must be a non-empty list"));
        }
    }
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutdoorStats {
    pub total_sessions: usize,
    pub total_routes: usize,
    pub grade_histogram: BTreeMap<String, usize>,
    pub onsight_pct: f64,
    pub flash_pct: f64,
    pub sent_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_grade_sent: Option<String>,
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

pub fn compute_outdoor_stats(sessions: &[OutdoorSessionEntry]) -> OutdoorStats {
    let mut stats = OutdoorStats {
        total_sessions: sessions.len(),
        ..OutdoorStats::default()
    };
    let mut onsight = 0usize;
    let mut flash = 0usize;
    let mut sent = 0usize;
    let mut grades_sent: Vec<&str> = Vec::new();

    for session in sessions {
        for route in &session.routes {
            stats.total_routes += 1;
            *stats.grade_histogram.entry(route.grade.clone()).or_insert(0) += 1;

            let any_sent = route.attempts.iter().any(|a| a.result == "sent");
            if !any_sent {
                continue;
            }
            sent += 1;
            grades_sent.push(&route.grade);
            match route.style.as_deref() {
                Some("onsight") => onsight += 1,
                Some("flash") => flash += 1,
                // A single sent attempt without a declared style reads as
                // an onsight.
                None if route.attempts.len() == 1 => onsight += 1,
                _ => {}
            }
        }
    }

    stats.onsight_pct = pct(onsight, stats.total_routes);
    stats.flash_pct = pct(flash, stats.total_routes);
    stats.sent_pct = pct(sent, stats.total_routes);
    stats.top_grade_sent = grades_sent.iter().max().map(|g| g.to_string());
    stats
}
