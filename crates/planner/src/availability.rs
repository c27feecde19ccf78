use serde::{Deserialize, Serialize};
use shared::{Location, Slot, Weekday};
use std::collections::BTreeMap;

/// Availability of one time slot as submitted by the client: either a
/// bare flag or a detailed spec with location preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotSpec {
    Flag(bool),
    Detail {
        #[serde(default = "default_true")]
        available: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locations: Option<Vec<Location>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preferred_location: Option<Location>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gym_id: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Day-level off switch; `false` blocks every slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<SlotSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<SlotSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<SlotSpec>,
}

impl DayAvailability {
    fn slot(&self, slot: Slot) -> Option<&SlotSpec> {
        match slot {
            Slot::Morning => self.morning.as_ref(),
            Slot::Lunch => self.lunch.as_ref(),
            Slot::Evening => self.evening.as_ref(),
        }
    }

    fn has_explicit_slots(&self) -> bool {
        self.morning.is_some() || self.lunch.is_some() || self.evening.is_some()
    }
}

/// Weekly availability grid keyed by weekday. Absent weekdays mean fully
/// available.
pub type Availability = BTreeMap<Weekday, DayAvailability>;

/// Fully-resolved availability of one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub available: bool,
    pub locations: Vec<Location>,
    pub preferred_location: Option<Location>,
    pub gym_id: Option<String>,
}

impl SlotInfo {
    fn default_for(allowed: &[Location]) -> Self {
        SlotInfo {
            available: true,
            locations: allowed.to_vec(),
            preferred_location: None,
            gym_id: None,
        }
    }
}

/// Resolve the sparse client grid into a dense per-weekday, per-slot view.
///
/// Rules: a missing day is fully available at the allowed locations; a
/// day with `available: false` is blocked; once a day lists any explicit
/// slot, unlisted slots are unavailable.
pub fn normalize_availability(
    availability: Option<&Availability>,
    allowed: &[Location],
) -> BTreeMap<Weekday, BTreeMap<Slot, SlotInfo>> {
    let mut allowed_sorted: Vec<Location> = allowed.to_vec();
    allowed_sorted.sort();
    allowed_sorted.dedup();

    let empty = DayAvailability::default();
    let mut normalized = BTreeMap::new();
    for weekday in Weekday::ALL {
        let day = availability.and_then(|a| a.get(&weekday)).unwrap_or(&empty);
        let mut slots = BTreeMap::new();
        for slot in Slot::ALL {
            let mut info = SlotInfo::default_for(&allowed_sorted);
            if day.available == Some(false) {
                info.available = false;
                slots.insert(slot, info);
                continue;
            }
            match day.slot(slot) {
                None => {
                    if day.has_explicit_slots() {
                        info.available = false;
                    }
                }
                Some(SlotSpec::Flag(flag)) => info.available = *flag,
                Some(SlotSpec::Detail {
                    available,
                    locations,
                    preferred_location,
                    gym_id,
                }) => {
                    info.available = *available;
                    if let Some(locations) = locations {
                        let mut locations = locations.clone();
                        locations.sort();
                        locations.dedup();
                        info.locations = locations;
                    }
                    info.preferred_location = *preferred_location;
                    info.gym_id = gym_id.clone();
                }
            }
            slots.insert(slot, info);
        }
        normalized.insert(weekday, slots);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME_GYM: &[Location] = &[Location::Home, Location::Gym];

    #[test]
    fn missing_days_are_fully_available() {
        let normalized = normalize_availability(None, HOME_GYM);
        for weekday in Weekday::ALL {
            for slot in Slot::ALL {
                assert!(normalized[&weekday][&slot].available);
            }
        }
    }

    #[test]
    fn day_off_switch_blocks_all_slots() {
        let grid: Availability = serde_json::from_value(serde_json::json!({
            "tue": { "available": false }
        }))
        .unwrap();
        let normalized = normalize_availability(Some(&grid), HOME_GYM);
        assert!(Slot::ALL.iter().all(|s| !normalized[&Weekday::Tue][s].available));
        assert!(normalized[&Weekday::Wed][&Slot::Morning].available);
    }

    #[test]
    fn explicit_slots_make_unlisted_slots_unavailable() {
        let grid: Availability = serde_json::from_value(serde_json::json!({
            "mon": { "evening": true }
        }))
        .unwrap();
        let normalized = normalize_availability(Some(&grid), HOME_GYM);
        assert!(normalized[&Weekday::Mon][&Slot::Evening].available);
        assert!(!normalized[&Weekday::Mon][&Slot::Morning].available);
        assert!(!normalized[&Weekday::Mon][&Slot::Lunch].available);
    }

    #[test]
    fn detailed_slot_spec_round_trips() {
        let grid: Availability = serde_json::from_value(serde_json::json!({
            "wed": {
                "evening": {
                    "locations": ["gym"],
                    "preferred_location": "gym",
                    "gym_id": "gym_center"
                }
            }
        }))
        .unwrap();
        let normalized = normalize_availability(Some(&grid), HOME_GYM);
        let info = &normalized[&Weekday::Wed][&Slot::Evening];
        assert!(info.available);
        assert_eq!(info.locations, vec![Location::Gym]);
        assert_eq!(info.preferred_location, Some(Location::Gym));
        assert_eq!(info.gym_id.as_deref(), Some("gym_center"));
    }
}
