use crate::tables::{PHASE_ORDER, base_weights, session_pool};
use crate::types::{
    Domain, DomainWeights, GoalSnapshot, Macrocycle, Phase, PhaseId, PretripDeload, Trip,
};
use crate::MacrocycleError;
use assessment::{AssessmentProfile, Goal, grade_gap, is_known_grade};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;

pub const MIN_TOTAL_WEEKS: u32 = 8;

/// Which phases a weak axis shifts weeks between: (extend, shrink).
fn weakness_adjustment(axis: &str) -> Option<(PhaseId, PhaseId)> {
    match axis {
        "power_endurance" => Some((PhaseId::PowerEndurance, PhaseId::StrengthPower)),
        "endurance" => Some((PhaseId::Base, PhaseId::StrengthPower)),
        "finger_strength" | "pulling_strength" => Some((PhaseId::StrengthPower, PhaseId::Base)),
        "technique" => Some((PhaseId::Base, PhaseId::Performance)),
        _ => None,
    }
}

/// Allocate phase durations for `total_weeks`.
///
/// Base allocation (12 weeks) is 4/3/2/2/1 in phase order. The single
/// weakest profile axis below 50 shifts one week toward the phase that
/// trains it. Non-deload phases keep a 2-week floor (1 for deload) where
/// possible; the base phase absorbs the remainder, and a final trim pass
/// guarantees the durations sum exactly to `total_weeks`.
fn allocate_durations(
    profile: &AssessmentProfile,
    total_weeks: u32,
) -> BTreeMap<PhaseId, i64> {
    let mut durations: BTreeMap<PhaseId, i64> = BTreeMap::from([
        (PhaseId::Base, 4),
        (PhaseId::StrengthPower, 3),
        (PhaseId::PowerEndurance, 2),
        (PhaseId::Performance, 2),
        (PhaseId::Deload, 1),
    ]);

    let weakest = profile
        .trainable_axes()
        .into_iter()
        .min_by_key(|(_, score)| *score);
    if let Some((axis, score)) = weakest {
        if score < 50 {
            if let Some((extend, shrink)) = weakness_adjustment(axis) {
                if durations[&shrink] > 2 {
                    *durations.entry(extend).or_insert(0) += 1;
                    *durations.entry(shrink).or_insert(0) -= 1;
                }
            }
        }
    }

    // Floors
    for phase in [
        PhaseId::Base,
        PhaseId::StrengthPower,
        PhaseId::PowerEndurance,
        PhaseId::Performance,
    ] {
        let d = durations.entry(phase).or_insert(2);
        *d = (*d).max(2);
    }

    // Scale to total_weeks: the base phase is the most flexible.
    let current: i64 = durations.values().sum();
    let diff = total_weeks as i64 - current;
    {
        let base = durations.entry(PhaseId::Base).or_insert(0);
        *base = (*base + diff).max(0);
    }

    // Trim pass: if the base floor pushed the sum past total_weeks,
    // shave later phases toward a 1-week floor until it fits.
    let mut excess: i64 = durations.values().sum::<i64>() - total_weeks as i64;
    for phase in [
        PhaseId::Performance,
        PhaseId::PowerEndurance,
        PhaseId::StrengthPower,
    ] {
        if excess <= 0 {
            break;
        }
        let d = durations.entry(phase).or_insert(1);
        let take = (*d - 1).min(excess).max(0);
        *d -= take;
        excess -= take;
    }

    durations
}

fn adjust_domain_weights(mut weights: DomainWeights, profile: &AssessmentProfile) -> DomainWeights {
    let by_axis: [(Domain, u8); 6] = [
        (Domain::FingerStrength, profile.finger_strength),
        (Domain::PullingStrength, profile.pulling_strength),
        (Domain::PowerEndurance, profile.power_endurance),
        (Domain::Technique, profile.technique),
        // Endurance maps onto climbing volume, body composition onto core/prehab.
        (Domain::VolumeClimbing, profile.endurance),
        (Domain::CorePrehab, profile.body_composition),
    ];

    for (domain, score) in by_axis {
        if let Some(weight) = weights.get_mut(&domain) {
            if score < 50 {
                *weight += 0.05;
            } else if score > 75 {
                *weight = (*weight - 0.03).max(0.02);
            }
        }
    }

    let total: f64 = weights.values().sum();
    if total > 0.0 {
        for weight in weights.values_mut() {
            *weight = (*weight / total * 1000.0).round() / 1000.0;
        }
    }
    weights
}

/// Goal sanity checks. These are advisory: generation never fails on an
/// ambitious or inverted goal, the caller decides what to surface.
pub fn validate_goal(goal: &Goal) -> Vec<String> {
    let mut warnings = Vec::new();
    match (goal.target_grade.as_deref(), goal.current_grade.as_deref()) {
        (Some(target), Some(current)) if is_known_grade(target) && is_known_grade(current) => {
            match grade_gap(target, current) {
                Ok(gap) if gap <= 0 => warnings.push(format!(
                    "target_grade ({target}) is not harder than current_grade ({current}). \
                     Consider setting a more ambitious target."
                )),
                Ok(gap) if gap > 8 => warnings.push(format!(
                    "target_grade ({target}) is {gap} half-grades above current_grade ({current}). \
                     A single macrocycle may not be sufficient."
                )),
                _ => {}
            }
        }
        (Some(target), _) if !is_known_grade(target) => {
            warnings.push(format!("Unknown target_grade: {target}"));
        }
        (_, Some(current)) if !is_known_grade(current) => {
            warnings.push(format!("Unknown current_grade: {current}"));
        }
        _ => {}
    }
    warnings
}

/// Trips whose 5-day pre-trip window overlaps the given phase date range.
fn pretrip_overlaps(trips: &[Trip], phase_start: NaiveDate, phase_end: NaiveDate) -> Vec<PretripDeload> {
    trips
        .iter()
        .filter_map(|trip| {
            let trip_start = trip.start_date?;
            let deload_from = trip_start - Days::new(5);
            (deload_from <= phase_end && trip_start >= phase_start).then(|| PretripDeload {
                trip_name: trip.name.clone(),
                trip_start,
                deload_from,
            })
        })
        .collect()
}

/// Generate a complete macrocycle of `total_weeks` weeks starting at
/// `start_date` (a Monday). Always returns a full phase sequence — a goal
/// deadline that cannot be met shows up as dates, not a partial plan.
pub fn generate(
    goal: &Goal,
    profile: &AssessmentProfile,
    trips: &[Trip],
    start_date: NaiveDate,
    total_weeks: u32,
    generated_at: DateTime<Utc>,
) -> Result<Macrocycle, MacrocycleError> {
    if total_weeks < MIN_TOTAL_WEEKS {
        return Err(MacrocycleError::TooFewWeeks {
            requested: total_weeks,
            minimum: MIN_TOTAL_WEEKS,
        });
    }

    let warnings = validate_goal(goal);
    let durations = allocate_durations(profile, total_weeks);

    let mut phases = Vec::new();
    let mut current_week: u32 = 1;
    for phase_id in PHASE_ORDER {
        let duration = durations[&phase_id];
        if duration <= 0 {
            continue;
        }
        let duration = duration as u32;

        let phase_start = start_date + Days::new(7 * (current_week as u64 - 1));
        let phase_end = phase_start + Days::new(7 * duration as u64 - 1);

        phases.push(Phase {
            phase_id,
            phase_name: phase_id.display_name().to_string(),
            start_week: current_week,
            end_week: current_week + duration - 1,
            duration_weeks: duration,
            energy_system: phase_id.energy_system().to_string(),
            domain_weights: adjust_domain_weights(base_weights(phase_id), profile),
            session_pool: session_pool(phase_id),
            intensity_cap: phase_id.intensity_cap(),
            notes: phase_id.notes().to_string(),
            pretrip_deload: pretrip_overlaps(trips, phase_start, phase_end),
        });
        current_week += duration;
    }

    Ok(Macrocycle {
        macrocycle_version: "macrocycle.v1".to_string(),
        generated_at: generated_at.to_rfc3339(),
        start_date,
        end_date: start_date + Days::new(7 * total_weeks as u64 - 1),
        goal_snapshot: GoalSnapshot {
            goal_type: goal.goal_type.clone(),
            target_grade: goal.target_grade.clone(),
            current_grade: goal.current_grade.clone(),
            deadline: goal.deadline,
        },
        assessment_snapshot: *profile,
        total_weeks,
        phases,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(scores: [u8; 6]) -> AssessmentProfile {
        AssessmentProfile {
            finger_strength: scores[0],
            pulling_strength: scores[1],
            power_endurance: scores[2],
            technique: scores[3],
            endurance: scores[4],
            body_composition: scores[5],
        }
    }

    #[test]
    fn default_twelve_week_allocation() {
        let d = allocate_durations(&profile([60; 6]), 12);
        assert_eq!(d[&PhaseId::Base], 4);
        assert_eq!(d[&PhaseId::StrengthPower], 3);
        assert_eq!(d[&PhaseId::PowerEndurance], 2);
        assert_eq!(d[&PhaseId::Performance], 2);
        assert_eq!(d[&PhaseId::Deload], 1);
    }

    #[test]
    fn weak_power_endurance_extends_its_phase() {
        let d = allocate_durations(&profile([70, 70, 30, 70, 70, 70]), 12);
        assert_eq!(d[&PhaseId::PowerEndurance], 3);
        assert_eq!(d[&PhaseId::StrengthPower], 2);
    }

    #[test]
    fn weak_fingers_extend_strength_power() {
        let d = allocate_durations(&profile([30, 70, 70, 70, 70, 70]), 12);
        assert_eq!(d[&PhaseId::StrengthPower], 4);
        assert_eq!(d[&PhaseId::Base], 3);
    }

    #[test]
    fn validate_goal_flags_inverted_target() {
        let goal = Goal {
            target_grade: Some("7a".to_string()),
            current_grade: Some("7c".to_string()),
            ..Goal::default()
        };
        let warnings = validate_goal(&goal);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not harder"));
    }

    #[test]
    fn validate_goal_flags_huge_gap() {
        let goal = Goal {
            target_grade: Some("8c".to_string()),
            current_grade: Some("7a".to_string()),
            ..Goal::default()
        };
        let warnings = validate_goal(&goal);
        assert!(warnings[0].contains("half-grades"));
    }

    #[test]
    fn pretrip_window_lands_on_overlapping_phase() {
        let trips = vec![Trip {
            name: "Siurana".to_string(),
            start_date: Some("2026-03-20".parse().unwrap()),
            end_date: None,
        }];
        let overlaps = pretrip_overlaps(
            &trips,
            "2026-03-02".parse().unwrap(),
            "2026-03-29".parse().unwrap(),
        );
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].deload_from, "2026-03-15".parse().unwrap());
    }
}
