use crate::types::{Domain, DomainWeights, PhaseId};
use shared::Intensity;

pub const PHASE_ORDER: [PhaseId; 5] = [
    PhaseId::Base,
    PhaseId::StrengthPower,
    PhaseId::PowerEndurance,
    PhaseId::Performance,
    PhaseId::Deload,
];

impl PhaseId {
    pub fn display_name(self) -> &'static str {
        match self {
            PhaseId::Base => "Endurance Base",
            PhaseId::StrengthPower => "Strength & Power",
            PhaseId::PowerEndurance => "Power Endurance",
            PhaseId::Performance => "Performance",
            PhaseId::Deload => "Deload",
        }
    }

    pub fn energy_system(self) -> &'static str {
        match self {
            PhaseId::Base => "aerobic",
            PhaseId::StrengthPower => "anaerobic_alactic",
            PhaseId::PowerEndurance => "anaerobic_lactic",
            PhaseId::Performance => "specific",
            PhaseId::Deload => "recovery",
        }
    }

    pub fn intensity_cap(self) -> Intensity {
        match self {
            PhaseId::Base => Intensity::Medium,
            PhaseId::StrengthPower => Intensity::Max,
            PhaseId::PowerEndurance => Intensity::High,
            PhaseId::Performance => Intensity::Max,
            PhaseId::Deload => Intensity::Low,
        }
    }

    pub fn notes(self) -> &'static str {
        match self {
            PhaseId::Base => {
                "Build aerobic base. High volume, low intensity. Focus technique and movement quality."
            }
            PhaseId::StrengthPower => {
                "Max strength development. Max hangs, limit bouldering, general strength. High quality, full rest."
            }
            PhaseId::PowerEndurance => {
                "Anaerobic capacity. 4x4, intervals, threshold climbing. Tolerate pump, push volume."
            }
            PhaseId::Performance => {
                "Peak performance. Limit climbing, projecting, outdoor. Reduce volume, maximize quality."
            }
            PhaseId::Deload => {
                "Recovery. Volume -50%. No max/high intensity. Mobility, prehab, easy climbing only."
            }
        }
    }
}

pub(crate) fn base_weights(phase: PhaseId) -> DomainWeights {
    use Domain::*;
    let entries: [(Domain, f64); 6] = match phase {
        PhaseId::Base => [
            (FingerStrength, 0.20),
            (PullingStrength, 0.15),
            (PowerEndurance, 0.15),
            (VolumeClimbing, 0.25),
            (Technique, 0.20),
            (CorePrehab, 0.05),
        ],
        PhaseId::StrengthPower => [
            (FingerStrength, 0.35),
            (PullingStrength, 0.25),
            (PowerEndurance, 0.10),
            (VolumeClimbing, 0.10),
            (Technique, 0.10),
            (CorePrehab, 0.10),
        ],
        PhaseId::PowerEndurance => [
            (FingerStrength, 0.15),
            (PullingStrength, 0.10),
            (PowerEndurance, 0.35),
            (VolumeClimbing, 0.15),
            (Technique, 0.15),
            (CorePrehab, 0.10),
        ],
        PhaseId::Performance => [
            (FingerStrength, 0.10),
            (PullingStrength, 0.05),
            (PowerEndurance, 0.20),
            (VolumeClimbing, 0.25),
            (Technique, 0.25),
            (CorePrehab, 0.15),
        ],
        PhaseId::Deload => [
            (FingerStrength, 0.05),
            (PullingStrength, 0.05),
            (PowerEndurance, 0.05),
            (VolumeClimbing, 0.10),
            (Technique, 0.05),
            (CorePrehab, 0.10),
        ],
    };
    entries.into_iter().collect()
}

/// Sessions eligible for materialization in a phase: primaries first,
/// then available alternatives, each group alphabetical.
pub fn session_pool(phase: PhaseId) -> Vec<String> {
    let (primary, available): (&[&str], &[&str]) = match phase {
        PhaseId::Base => (
            &[
                "endurance_aerobic_gym",
                "finger_maintenance_home",
                "finger_strength_home",
                "prehab_maintenance",
                "technique_focus_gym",
            ],
            &[
                "complementary_conditioning",
                "flexibility_full",
                "handstand_practice",
                "power_endurance_gym",
                "strength_long",
            ],
        ),
        PhaseId::StrengthPower => (
            &[
                "finger_strength_home",
                "power_contact_gym",
                "prehab_maintenance",
                "strength_long",
            ],
            &[
                "complementary_conditioning",
                "flexibility_full",
                "handstand_practice",
                "technique_focus_gym",
            ],
        ),
        PhaseId::PowerEndurance => (
            &["power_endurance_gym", "prehab_maintenance"],
            &[
                "endurance_aerobic_gym",
                "finger_strength_home",
                "flexibility_full",
                "handstand_practice",
                "technique_focus_gym",
            ],
        ),
        PhaseId::Performance => (
            &["prehab_maintenance", "technique_focus_gym"],
            &[
                "finger_strength_home",
                "flexibility_full",
                "handstand_practice",
                "power_contact_gym",
                "power_endurance_gym",
            ],
        ),
        PhaseId::Deload => (
            &[
                "flexibility_full",
                "prehab_maintenance",
                "regeneration_easy",
                "yoga_recovery",
            ],
            &["handstand_practice"],
        ),
    };
    primary
        .iter()
        .chain(available.iter())
        .map(|s| (*s).to_string())
        .collect()
}
