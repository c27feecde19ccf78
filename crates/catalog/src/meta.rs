use shared::{Intensity, Location};

/// Scheduling metadata for a catalog session: how it counts against
/// weekly constraints and where it can happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMeta {
    /// Counts against the weekly hard-day cap.
    pub hard: bool,
    /// Needs a 48h gap from other finger-loading sessions.
    pub finger: bool,
    pub intensity: Intensity,
    /// Climbing-related sessions are placed first by the materializer.
    pub climbing: bool,
    pub locations: &'static [Location],
}

const HOME: &[Location] = &[Location::Home];
const GYM: &[Location] = &[Location::Gym];
const HOME_GYM: &[Location] = &[Location::Home, Location::Gym];
const ANYWHERE: &[Location] = &[Location::Home, Location::Gym, Location::Outdoor];

/// Metadata for every session in the catalog. Unknown ids fall back to a
/// conservative low-intensity profile so a stale plan never gains a hard
/// day by accident.
pub fn session_meta(session_id: &str) -> SessionMeta {
    match session_id {
        "strength_long" => SessionMeta {
            hard: true,
            finger: true,
            intensity: Intensity::Max,
            climbing: true,
            locations: HOME_GYM,
        },
        "power_contact_gym" => SessionMeta {
            hard: true,
            finger: false,
            intensity: Intensity::Max,
            climbing: true,
            locations: GYM,
        },
        "power_endurance_gym" => SessionMeta {
            hard: true,
            finger: false,
            intensity: Intensity::High,
            climbing: true,
            locations: GYM,
        },
        "endurance_aerobic_gym" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Medium,
            climbing: true,
            locations: GYM,
        },
        "technique_focus_gym" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Medium,
            climbing: true,
            locations: GYM,
        },
        "finger_strength_home" => SessionMeta {
            hard: true,
            finger: true,
            intensity: Intensity::Max,
            climbing: true,
            locations: HOME,
        },
        "finger_maintenance_home" => SessionMeta {
            hard: false,
            finger: true,
            intensity: Intensity::Medium,
            climbing: true,
            locations: HOME,
        },
        "prehab_maintenance" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Low,
            climbing: false,
            locations: HOME_GYM,
        },
        "flexibility_full" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Low,
            climbing: false,
            locations: HOME_GYM,
        },
        "yoga_recovery" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Low,
            climbing: false,
            locations: HOME,
        },
        "handstand_practice" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Medium,
            climbing: false,
            locations: HOME_GYM,
        },
        "complementary_conditioning" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Medium,
            climbing: false,
            locations: HOME_GYM,
        },
        "regeneration_easy" => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Low,
            climbing: false,
            locations: ANYWHERE,
        },
        "test_max_hang_5s" => SessionMeta {
            hard: true,
            finger: true,
            intensity: Intensity::High,
            climbing: false,
            locations: HOME_GYM,
        },
        "test_repeater_7_3" => SessionMeta {
            hard: true,
            finger: true,
            intensity: Intensity::High,
            climbing: false,
            locations: HOME_GYM,
        },
        "test_max_weighted_pullup" => SessionMeta {
            hard: true,
            finger: false,
            intensity: Intensity::High,
            climbing: false,
            locations: HOME_GYM,
        },
        _ => SessionMeta {
            hard: false,
            finger: false,
            intensity: Intensity::Low,
            climbing: false,
            locations: HOME_GYM,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_sessions_are_flagged() {
        assert!(session_meta("strength_long").hard);
        assert!(session_meta("finger_strength_home").finger);
        assert!(!session_meta("yoga_recovery").hard);
    }

    #[test]
    fn unknown_sessions_fall_back_conservative() {
        let meta = session_meta("does_not_exist");
        assert!(!meta.hard);
        assert_eq!(meta.intensity, Intensity::Low);
    }

    #[test]
    fn gym_only_sessions_exclude_home() {
        assert!(!session_meta("power_contact_gym").locations.contains(&Location::Home));
        assert!(session_meta("regeneration_easy").locations.contains(&Location::Outdoor));
    }
}
