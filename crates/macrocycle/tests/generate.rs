use assessment::{AssessmentProfile, Goal};
use chrono::{NaiveDate, TimeZone, Utc};
use macrocycle::{MacrocycleError, PhaseId, Trip, current_phase_and_week, generate, week_context};

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

fn goal(target: &str, current: &str, deadline: &str) -> Goal {
    Goal {
        goal_type: Some("grade".to_string()),
        target_grade: Some(target.to_string()),
        current_grade: Some(current.to_string()),
        deadline: Some(deadline.parse().unwrap()),
        ..Goal::default()
    }
}

fn monday() -> NaiveDate {
    "2026-03-02".parse().unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn phase_durations_sum_to_total_weeks_across_input_space() {
    // Sweep axis scores and total week counts; the sum invariant must hold
    // for every combination, including ones that trigger the weakness shift.
    for weak_axis in 0..6 {
        for weak_score in [10u8, 30, 49, 50, 80] {
            for total_weeks in 8..=24 {
                let mut scores = [65u8; 6];
                scores[weak_axis] = weak_score;
                let mc = generate(
                    &goal("7c", "7a", "2026-06-01"),
                    &profile(scores),
                    &[],
                    monday(),
                    total_weeks,
                    now(),
                )
                .unwrap();

                let sum: u32 = mc.phases.iter().map(|p| p.duration_weeks).sum();
                assert_eq!(
                    sum, total_weeks,
                    "axis={weak_axis} score={weak_score} total={total_weeks}"
                );
                assert!(mc.phases.iter().all(|p| p.duration_weeks > 0));
            }
        }
    }
}

#[test]
fn phases_are_contiguous_and_ordered() {
    let mc = generate(
        &goal("7c+", "7a", "2026-06-01"),
        &profile([40, 55, 45, 60, 50, 70]),
        &[],
        monday(),
        12,
        now(),
    )
    .unwrap();

    let mut expected_start = 1;
    for phase in &mc.phases {
        assert_eq!(phase.start_week, expected_start);
        assert_eq!(phase.end_week, phase.start_week + phase.duration_weeks - 1);
        expected_start = phase.end_week + 1;
    }
    assert_eq!(expected_start - 1, mc.total_weeks);
}

#[test]
fn twelve_week_goal_two_grades_out_places_deload_before_final_week() {
    // Deadline 12 weeks out, target two full grades (4 half-grades) above
    // current: the macrocycle spans exactly 12 weeks and ends with the
    // deload phase positioned before the final performance date window.
    let mc = generate(
        &goal("8a", "7b", "2026-05-24"),
        &profile([55, 60, 45, 60, 50, 65]),
        &[],
        monday(),
        12,
        now(),
    )
    .unwrap();

    assert_eq!(mc.total_weeks, 12);
    let sum: u32 = mc.phases.iter().map(|p| p.duration_weeks).sum();
    assert_eq!(sum, 12);

    let deload = mc
        .phases
        .iter()
        .find(|p| p.phase_id == PhaseId::Deload)
        .expect("deload phase present");
    assert_eq!(deload.end_week, 12, "deload closes the cycle inside the deadline");
    assert!(
        deload.start_week > mc.phases[0].end_week,
        "deload sits at the tail, not the front"
    );
    assert_eq!(mc.end_date, "2026-05-24".parse::<NaiveDate>().unwrap());
}

#[test]
fn generation_is_complete_even_when_deadline_is_infeasible() {
    // 8 half-grades above current with a near deadline: still a full plan,
    // with the gap visible by comparing dates, plus a warning.
    let mc = generate(
        &goal("8c", "7a", "2026-04-01"),
        &profile([60; 6]),
        &[],
        monday(),
        16,
        now(),
    )
    .unwrap();
    assert_eq!(
        mc.phases.iter().map(|p| p.duration_weeks).sum::<u32>(),
        16
    );
    assert!(mc.end_date > "2026-04-01".parse::<NaiveDate>().unwrap());
    assert!(!mc.warnings.is_empty());
}

#[test]
fn too_few_weeks_is_rejected() {
    let result = generate(
        &goal("7c", "7a", "2026-06-01"),
        &profile([60; 6]),
        &[],
        monday(),
        4,
        now(),
    );
    assert!(matches!(result, Err(MacrocycleError::TooFewWeeks { .. })));
}

#[test]
fn pretrip_deload_recorded_on_the_right_phase() {
    let trips = vec![Trip {
        name: "Fontainebleau".to_string(),
        start_date: Some("2026-03-27".parse().unwrap()),
        end_date: Some("2026-04-02".parse().unwrap()),
    }];
    let mc = generate(
        &goal("7c", "7a", "2026-06-01"),
        &profile([60; 6]),
        &trips,
        monday(),
        12,
        now(),
    )
    .unwrap();

    let base = &mc.phases[0];
    assert_eq!(base.phase_id, PhaseId::Base);
    assert_eq!(base.pretrip_deload.len(), 1);
    assert_eq!(
        base.pretrip_deload[0].deload_from,
        "2026-03-22".parse::<NaiveDate>().unwrap()
    );
}

#[test]
fn week_context_resolves_phases_and_boundaries() {
    let mc = generate(
        &goal("7c", "7a", "2026-06-01"),
        &profile([60; 6]),
        &[],
        monday(),
        12,
        now(),
    )
    .unwrap();

    let today = monday();
    let w1 = week_context(&mc, 1, today).unwrap();
    assert_eq!(w1.phase_id, PhaseId::Base);
    assert_eq!(w1.start_date, monday());
    assert!(!w1.is_last_week_of_phase);

    let w4 = week_context(&mc, 4, today).unwrap();
    assert_eq!(w4.phase_id, PhaseId::Base);
    assert!(w4.is_last_week_of_phase);

    let w5 = week_context(&mc, 5, today).unwrap();
    assert_eq!(w5.phase_id, PhaseId::StrengthPower);

    let w12 = week_context(&mc, 12, today).unwrap();
    assert_eq!(w12.phase_id, PhaseId::Deload);
    assert!(w12.is_last_week_of_phase);

    assert!(matches!(
        week_context(&mc, 13, today),
        Err(MacrocycleError::WeekOutOfRange { .. })
    ));
}

#[test]
fn week_zero_resolves_from_today() {
    let mc = generate(
        &goal("7c", "7a", "2026-06-01"),
        &profile([60; 6]),
        &[],
        monday(),
        12,
        now(),
    )
    .unwrap();

    // Third week, Wednesday
    let today: NaiveDate = "2026-03-18".parse().unwrap();
    let ctx = week_context(&mc, 0, today).unwrap();
    assert_eq!(ctx.week_num, 3);
    assert_eq!(ctx.start_date, "2026-03-16".parse::<NaiveDate>().unwrap());

    let (pi, wi) = current_phase_and_week(&mc, today).unwrap();
    assert_eq!((pi, wi), (0, 2));

    // Past the end clamps to the last week
    let late: NaiveDate = "2027-01-01".parse().unwrap();
    let ctx = week_context(&mc, 0, late).unwrap();
    assert_eq!(ctx.week_num, 12);
}
