use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Time-of-day slot for a scheduled session.
///
/// Ordering matters: sessions within a day are sorted morning → evening.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Morning,
    Lunch,
    Evening,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Morning, Slot::Lunch, Slot::Evening];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Location {
    Home,
    Gym,
    Outdoor,
}

/// Session intensity level. The ordering is the phase-cap ordering:
/// a session is allowed when its intensity <= the phase cap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
    Max,
}

impl Intensity {
    /// Fallback load score used when a session has not been resolved yet.
    pub fn estimated_load(self) -> u32 {
        match self {
            Intensity::Low => 20,
            Intensity::Medium => 40,
            Intensity::High => 65,
            Intensity::Max => 85,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn from_date(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self::ALL[date.weekday().num_days_from_monday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn slot_wire_form_is_snake_case() {
        assert_eq!(serde_json::to_string(&Slot::Morning).unwrap(), "\"morning\"");
        assert_eq!(Slot::from_str("evening").unwrap(), Slot::Evening);
    }

    #[test]
    fn intensity_ordering_matches_cap_semantics() {
        assert!(Intensity::Low < Intensity::Medium);
        assert!(Intensity::High < Intensity::Max);
        assert!(Intensity::Medium <= Intensity::Medium);
    }

    #[test]
    fn weekday_from_date() {
        let monday = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(Weekday::from_date(monday), Weekday::Mon);
        assert_eq!(Weekday::from_date(monday + chrono::Days::new(6)), Weekday::Sun);
    }
}
