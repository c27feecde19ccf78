use crate::grades::{grade_gap, grade_index, is_known_grade};
use crate::types::{
    AssessmentInput, AssessmentProfile, BodyMetrics, GradeHistory, Goal, SelfEval, TestResults,
    Weakness,
};
use crate::AssessmentError;

const DEFAULT_BODYWEIGHT_KG: f64 = 70.0;
const DEFAULT_TARGET_GRADE: &str = "7c+";
const DEFAULT_CURRENT_GRADE: &str = "7a";

/// Max hang 20mm/5s benchmark: total load / bodyweight ratio per target grade.
const FINGER_BENCHMARK: [(&str, f64); 14] = [
    ("7a", 1.0),
    ("7a+", 1.08),
    ("7b", 1.15),
    ("7b+", 1.20),
    ("7c", 1.25),
    ("7c+", 1.30),
    ("8a", 1.40),
    ("8a+", 1.50),
    ("8b", 1.60),
    ("8b+", 1.70),
    ("8c", 1.80),
    ("8c+", 1.90),
    ("9a", 2.00),
    ("9a+", 2.10),
];

/// Weighted pull-up 1RM benchmark: total load / bodyweight ratio per target grade.
const PULLING_BENCHMARK: [(&str, f64); 14] = [
    ("7a", 1.20),
    ("7a+", 1.25),
    ("7b", 1.30),
    ("7b+", 1.35),
    ("7c", 1.40),
    ("7c+", 1.45),
    ("8a", 1.55),
    ("8a+", 1.65),
    ("8b", 1.75),
    ("8b+", 1.85),
    ("8c", 1.95),
    ("8c+", 2.05),
    ("9a", 2.15),
    ("9a+", 2.25),
];

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Benchmark for the target grade, falling back to the nearest grade that
/// has a table entry.
fn benchmark_for(table: &[(&str, f64)], target_grade: &str) -> Result<f64, AssessmentError> {
    if let Some((_, ratio)) = table.iter().find(|(g, _)| *g == target_grade) {
        return Ok(*ratio);
    }
    let target_idx = grade_index(target_grade)? as i32;
    let nearest = table
        .iter()
        .min_by_key(|(g, _)| {
            // table grades are all known
            (grade_index(g).unwrap_or(0) as i32 - target_idx).abs()
        })
        .map(|(_, ratio)| *ratio);
    Ok(nearest.unwrap_or(1.0))
}

fn weakness_penalty(self_eval: &SelfEval, weakness: Weakness, primary: f64, secondary: f64) -> f64 {
    if self_eval.primary_weakness == Some(weakness) {
        primary
    } else if self_eval.secondary_weakness == Some(weakness) {
        secondary
    } else {
        0.0
    }
}

/// Score from the current/target grade ratio, used when no test result is
/// available. `scale` is the score a climber already at the target grade
/// would get — deliberately below 100 so untested axes read conservative.
fn grade_ratio_score(current: &str, target: &str, scale: f64) -> Result<f64, AssessmentError> {
    let current_idx = if is_known_grade(current) {
        grade_index(current)? as f64
    } else {
        0.0
    };
    let target_idx = grade_index(target)? as f64;
    if target_idx > 0.0 {
        Ok(current_idx / target_idx * scale)
    } else {
        Ok(50.0)
    }
}

fn finger_strength(
    tests: &TestResults,
    body: &BodyMetrics,
    self_eval: &SelfEval,
    target: &str,
    current: &str,
) -> Result<u8, AssessmentError> {
    let bw = body.weight_kg.unwrap_or(DEFAULT_BODYWEIGHT_KG);
    let score = match tests.max_hang_20mm_5s_total_kg {
        Some(max_hang) => {
            let benchmark = benchmark_for(&FINGER_BENCHMARK, target)?;
            (max_hang / bw) / benchmark * 100.0
        }
        None => {
            grade_ratio_score(current, target, 70.0)?
                - weakness_penalty(self_eval, Weakness::FingersGiveOut, 15.0, 8.0)
        }
    };
    Ok(clamp_score(score))
}

fn pulling_strength(
    tests: &TestResults,
    body: &BodyMetrics,
    self_eval: &SelfEval,
    target: &str,
    current: &str,
) -> Result<u8, AssessmentError> {
    let bw = body.weight_kg.unwrap_or(DEFAULT_BODYWEIGHT_KG);
    let score = match tests.weighted_pullup_1rm_total_kg {
        Some(wp_1rm) => {
            let benchmark = benchmark_for(&PULLING_BENCHMARK, target)?;
            (wp_1rm / bw) / benchmark * 100.0
        }
        None => {
            grade_ratio_score(current, target, 65.0)?
                - weakness_penalty(self_eval, Weakness::CantHoldHardMoves, 10.0, 5.0)
        }
    };
    Ok(clamp_score(score))
}

/// Redpoint/onsight gap as a proxy: a narrow gap means route fitness, a
/// wide one means strength outpaces endurance on the wall.
fn rp_os_gap_score(grades: &GradeHistory, narrow: f64, mid: f64, wide: f64, base: f64) -> f64 {
    match (&grades.lead_max_rp, &grades.lead_max_os) {
        (Some(rp), Some(os)) if is_known_grade(rp) && is_known_grade(os) => {
            match grade_gap(rp, os) {
                Ok(gap) if gap <= 2 => narrow,
                Ok(gap) if gap <= 4 => mid,
                Ok(gap) if gap <= 6 => wide,
                Ok(_) => 30.0,
                Err(_) => base,
            }
        }
        _ => base,
    }
}

fn power_endurance(grades: &GradeHistory, self_eval: &SelfEval) -> u8 {
    let score = rp_os_gap_score(grades, 75.0, 55.0, 40.0, 50.0)
        - weakness_penalty(self_eval, Weakness::PumpTooEarly, 15.0, 8.0);
    clamp_score(score)
}

fn technique(grades: &GradeHistory, self_eval: &SelfEval) -> u8 {
    let mut score = rp_os_gap_score(grades, 80.0, 60.0, 40.0, 50.0);
    for weakness in [Weakness::TechniqueErrors, Weakness::CantReadRoutes] {
        score -= weakness_penalty(self_eval, weakness, 10.0, 5.0);
    }
    clamp_score(score)
}

fn endurance(pe_score: u8, input: &AssessmentInput) -> u8 {
    let mut score = pe_score as f64 * 0.8;
    let years = input.experience.climbing_years.unwrap_or(0) as f64;
    score += (years * 2.0).min(10.0);
    score -= weakness_penalty(&input.self_eval, Weakness::PumpTooEarly, 10.0, 5.0);
    score -= weakness_penalty(&input.self_eval, Weakness::CantManageRests, 10.0, 5.0);
    clamp_score(score)
}

fn body_composition(body: &BodyMetrics, finger_score: u8) -> u8 {
    let score = match body.body_fat_pct {
        Some(bf) if bf <= 10.0 => 95.0,
        Some(bf) if bf <= 12.0 => 85.0,
        Some(bf) if bf <= 14.0 => 78.0,
        Some(bf) if bf <= 16.0 => 70.0,
        Some(bf) if bf <= 18.0 => 60.0,
        Some(bf) if bf <= 20.0 => 50.0,
        Some(bf) if bf <= 25.0 => 35.0,
        Some(_) => 20.0,
        // No measurement: strong-for-weight implies decent composition.
        None => (finger_score as f64 * 0.9).min(70.0),
    };
    clamp_score(score)
}

/// Compute the 6-axis profile from raw assessment data and the goal.
pub fn compute_profile(
    input: &AssessmentInput,
    goal: &Goal,
) -> Result<AssessmentProfile, AssessmentError> {
    let target = goal.target_grade.as_deref().unwrap_or(DEFAULT_TARGET_GRADE);
    let current = goal.current_grade.as_deref().unwrap_or(DEFAULT_CURRENT_GRADE);

    let finger = finger_strength(&input.tests, &input.body, &input.self_eval, target, current)?;
    let pulling = pulling_strength(&input.tests, &input.body, &input.self_eval, target, current)?;
    let pe = power_endurance(&input.grades, &input.self_eval);

    Ok(AssessmentProfile {
        finger_strength: finger,
        pulling_strength: pulling,
        power_endurance: pe,
        technique: technique(&input.grades, &input.self_eval),
        endurance: endurance(pe, input),
        body_composition: body_composition(&input.body, finger),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: &str, current: &str) -> Goal {
        Goal {
            target_grade: Some(target.to_string()),
            current_grade: Some(current.to_string()),
            ..Goal::default()
        }
    }

    #[test]
    fn measured_finger_strength_at_benchmark_scores_100() {
        // 77kg climber targeting 7c+ (ratio 1.30): 100.1kg total = on benchmark
        let input = AssessmentInput {
            body: BodyMetrics {
                weight_kg: Some(77.0),
                ..BodyMetrics::default()
            },
            tests: TestResults {
                max_hang_20mm_5s_total_kg: Some(77.0 * 1.30),
                ..TestResults::default()
            },
            ..AssessmentInput::default()
        };
        let profile = compute_profile(&input, &goal("7c+", "7a")).unwrap();
        assert_eq!(profile.finger_strength, 100);
    }

    #[test]
    fn scores_clamp_to_valid_range() {
        let input = AssessmentInput {
            body: BodyMetrics {
                weight_kg: Some(70.0),
                ..BodyMetrics::default()
            },
            tests: TestResults {
                max_hang_20mm_5s_total_kg: Some(300.0),
                weighted_pullup_1rm_total_kg: Some(10.0),
                ..TestResults::default()
            },
            ..AssessmentInput::default()
        };
        let profile = compute_profile(&input, &goal("7c+", "7a")).unwrap();
        assert_eq!(profile.finger_strength, 100);
        assert!(profile.pulling_strength <= 100);
    }

    #[test]
    fn untested_axes_estimate_from_grades_with_weakness_penalty() {
        let mut input = AssessmentInput::default();
        let baseline = compute_profile(&input, &goal("7c", "7a")).unwrap();

        input.self_eval.primary_weakness = Some(Weakness::FingersGiveOut);
        let penalized = compute_profile(&input, &goal("7c", "7a")).unwrap();
        assert_eq!(
            penalized.finger_strength,
            baseline.finger_strength.saturating_sub(15)
        );
    }

    #[test]
    fn narrow_rp_os_gap_reads_as_route_fitness() {
        let input = AssessmentInput {
            grades: GradeHistory {
                lead_max_rp: Some("7b".to_string()),
                lead_max_os: Some("7a+".to_string()),
                ..GradeHistory::default()
            },
            ..AssessmentInput::default()
        };
        let profile = compute_profile(&input, &goal("7c", "7a")).unwrap();
        assert_eq!(profile.power_endurance, 75);
        assert_eq!(profile.technique, 80);
    }

    #[test]
    fn wide_rp_os_gap_reads_as_endurance_deficit() {
        let input = AssessmentInput {
            grades: GradeHistory {
                lead_max_rp: Some("7c".to_string()),
                lead_max_os: Some("7a".to_string()),
                ..GradeHistory::default()
            },
            ..AssessmentInput::default()
        };
        let profile = compute_profile(&input, &goal("8a", "7c")).unwrap();
        assert_eq!(profile.power_endurance, 55);
    }

    #[test]
    fn benchmark_falls_back_to_nearest_grade() {
        // 6b has no benchmark entry; nearest is 7a
        let ratio = benchmark_for(&FINGER_BENCHMARK, "6b").unwrap();
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn unknown_target_grade_is_rejected() {
        let input = AssessmentInput {
            body: BodyMetrics {
                weight_kg: Some(70.0),
                ..BodyMetrics::default()
            },
            tests: TestResults {
                max_hang_20mm_5s_total_kg: Some(90.0),
                ..TestResults::default()
            },
            ..AssessmentInput::default()
        };
        assert!(compute_profile(&input, &goal("V12", "7a")).is_err());
    }

    #[test]
    fn body_fat_bands() {
        let mut input = AssessmentInput::default();
        input.body.body_fat_pct = Some(11.0);
        let profile = compute_profile(&input, &goal("7c", "7a")).unwrap();
        assert_eq!(profile.body_composition, 85);

        input.body.body_fat_pct = Some(30.0);
        let profile = compute_profile(&input, &goal("7c", "7a")).unwrap();
        assert_eq!(profile.body_composition, 20);
    }
}
