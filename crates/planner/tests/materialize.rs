use chrono::{NaiveDate, TimeZone, Utc};
use macrocycle::{PhaseContext, PhaseId, session_pool};
use planner::{
    Availability, Gym, MaterializeParams, PlanningPrefs, materialize, normalize_availability,
};
use shared::{Intensity, Location, SlotStatus};

fn monday() -> NaiveDate {
    "2026-03-02".parse().unwrap()
}

fn ctx(phase_id: PhaseId) -> PhaseContext {
    PhaseContext {
        phase_id,
        domain_weights: Default::default(),
        session_pool: session_pool(phase_id),
        intensity_cap: phase_id.intensity_cap(),
        start_date: monday(),
        week_num: 2,
        is_last_week_of_phase: false,
    }
}

fn params<'a>(ctx: &'a PhaseContext, prefs: &'a PlanningPrefs, gyms: &'a [Gym]) -> MaterializeParams<'a> {
    MaterializeParams {
        ctx,
        availability: None,
        allowed_locations: &[Location::Home, Location::Gym],
        prefs,
        gyms,
        pretrip_dates: &[],
        generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
    }
}

fn hard_day_count(plan: &planner::WeekPlan) -> usize {
    plan.weeks[0]
        .days
        .iter()
        .filter(|d| d.sessions.iter().any(|s| s.tags.hard))
        .count()
}

#[test]
fn week_has_seven_contiguous_days() {
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs::default();
    let plan = materialize(&params(&ctx, &prefs, &[]));

    assert_eq!(plan.weeks.len(), 1);
    let days = &plan.weeks[0].days;
    assert_eq!(days.len(), 7);
    for (i, day) in days.iter().enumerate() {
        assert_eq!(day.date, monday() + chrono::Days::new(i as u64));
    }
    assert!(days.iter().flat_map(|d| &d.sessions).all(|s| s.status == SlotStatus::Planned));
}

#[test]
fn materialization_is_deterministic() {
    let ctx = ctx(PhaseId::StrengthPower);
    let prefs = PlanningPrefs::default();
    let a = materialize(&params(&ctx, &prefs, &[]));
    let b = materialize(&params(&ctx, &prefs, &[]));
    assert_eq!(a, b);
}

#[test]
fn hard_day_cap_is_respected() {
    let ctx = ctx(PhaseId::StrengthPower);
    for cap in 1..=3u32 {
        let prefs = PlanningPrefs {
            hard_day_cap_per_week: cap,
            target_training_days_per_week: 6,
            default_gym_id: None,
        };
        let plan = materialize(&params(&ctx, &prefs, &[]));
        assert!(
            hard_day_count(&plan) <= cap as usize,
            "cap {cap} violated"
        );
    }
}

#[test]
fn no_consecutive_finger_or_hard_days() {
    let ctx = ctx(PhaseId::StrengthPower);
    let prefs = PlanningPrefs {
        hard_day_cap_per_week: 3,
        target_training_days_per_week: 6,
        default_gym_id: None,
    };
    let plan = materialize(&params(&ctx, &prefs, &[]));

    let days = &plan.weeks[0].days;
    for pair in days.windows(2) {
        let finger = |d: &planner::DayPlan| d.sessions.iter().any(|s| s.tags.finger);
        let hard = |d: &planner::DayPlan| d.sessions.iter().any(|s| s.tags.hard);
        assert!(!(finger(&pair[0]) && finger(&pair[1])), "consecutive finger days");
        assert!(!(hard(&pair[0]) && hard(&pair[1])), "consecutive hard days");
    }
}

#[test]
fn training_days_capped_to_target() {
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs {
        hard_day_cap_per_week: 3,
        target_training_days_per_week: 3,
        default_gym_id: None,
    };
    let plan = materialize(&params(&ctx, &prefs, &[]));
    let training_days = plan.weeks[0]
        .days
        .iter()
        .filter(|d| !d.sessions.is_empty())
        .count();
    assert!(training_days <= 3);
}

#[test]
fn blocked_days_get_no_sessions() {
    let grid: Availability = serde_json::from_value(serde_json::json!({
        "mon": { "available": false },
        "tue": { "available": false },
        "wed": { "available": false },
        "thu": { "available": false },
        "fri": { "available": false }
    }))
    .unwrap();
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs::default();
    let mut p = params(&ctx, &prefs, &[]);
    p.availability = Some(&grid);
    let plan = materialize(&p);

    for day in &plan.weeks[0].days[..5] {
        assert!(day.sessions.is_empty(), "{} should be a rest day", day.date);
    }
    // Weekend remains usable
    assert!(plan.weeks[0].days[5..].iter().any(|d| !d.sessions.is_empty()));
}

#[test]
fn phase_intensity_cap_filters_sessions() {
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs::default();
    let plan = materialize(&params(&ctx, &prefs, &[]));
    // Base phase caps at medium: nothing scheduled above it.
    for session in plan.weeks[0].days.iter().flat_map(|d| &d.sessions) {
        assert!(session.intensity <= Intensity::Medium, "{}", session.session_id);
    }
}

#[test]
fn deload_week_drops_hard_work_and_halves_targets() {
    let ctx = ctx(PhaseId::Deload);
    let prefs = PlanningPrefs::default();
    let plan = materialize(&params(&ctx, &prefs, &[]));

    assert_eq!(plan.weeks[0].targets.deload_factor, 0.5);
    assert_eq!(plan.weeks[0].targets.hard_days, 0);
    let sessions: Vec<_> = plan.weeks[0].days.iter().flat_map(|d| &d.sessions).collect();
    assert!(sessions.len() <= 3);
    assert!(sessions.iter().all(|s| !s.tags.hard));
    assert_eq!(plan.weekly_load_summary.hard_days_count, 0);
}

#[test]
fn last_week_of_strength_phase_injects_tests() {
    let mut ctx = ctx(PhaseId::StrengthPower);
    ctx.is_last_week_of_phase = true;
    let prefs = PlanningPrefs {
        hard_day_cap_per_week: 3,
        target_training_days_per_week: 5,
        default_gym_id: None,
    };
    let plan = materialize(&params(&ctx, &prefs, &[]));

    let ids: Vec<&str> = plan.weeks[0]
        .days
        .iter()
        .flat_map(|d| &d.sessions)
        .map(|s| s.session_id.as_str())
        .collect();
    assert!(ids.contains(&"test_max_hang_5s"), "required test missing: {ids:?}");
}

#[test]
fn gym_sessions_get_the_default_gym() {
    let gyms = vec![
        Gym {
            gym_id: "gym_b".to_string(),
            name: "Blochaus".to_string(),
            priority: 2,
            equipment: vec!["gym_boulder".to_string()],
        },
        Gym {
            gym_id: "gym_a".to_string(),
            name: "Arkose".to_string(),
            priority: 1,
            equipment: vec!["gym_routes".to_string()],
        },
    ];
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs::default();
    let plan = materialize(&params(&ctx, &prefs, &gyms));

    let gym_sessions: Vec<_> = plan
        .weeks[0]
        .days
        .iter()
        .flat_map(|d| &d.sessions)
        .filter(|s| s.location == Location::Gym)
        .collect();
    assert!(!gym_sessions.is_empty());
    assert!(gym_sessions.iter().all(|s| s.gym_id.as_deref() == Some("gym_a")));
}

#[test]
fn pretrip_dates_block_hard_sessions() {
    let ctx = ctx(PhaseId::StrengthPower);
    let prefs = PlanningPrefs {
        hard_day_cap_per_week: 3,
        target_training_days_per_week: 6,
        default_gym_id: None,
    };
    let pretrip: Vec<NaiveDate> = (0..7).map(|i| monday() + chrono::Days::new(i)).collect();
    let mut p = params(&ctx, &prefs, &[]);
    p.pretrip_dates = &pretrip;
    let plan = materialize(&p);

    assert_eq!(hard_day_count(&plan), 0);
    assert!(plan.weeks[0].days.iter().all(|d| d.pretrip_deload));
}

#[test]
fn preferred_location_disqualifies_incompatible_sessions() {
    // Every slot prefers home: gym-only sessions cannot be placed.
    let grid: Availability = serde_json::from_value(serde_json::json!({
        "mon": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "tue": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "wed": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "thu": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "fri": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "sat": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} },
        "sun": { "morning": {"preferred_location": "home"}, "lunch": {"preferred_location": "home"}, "evening": {"preferred_location": "home"} }
    }))
    .unwrap();
    let ctx = ctx(PhaseId::Base);
    let prefs = PlanningPrefs::default();
    let mut p = params(&ctx, &prefs, &[]);
    p.availability = Some(&grid);
    let plan = materialize(&p);

    for session in plan.weeks[0].days.iter().flat_map(|d| &d.sessions) {
        assert_eq!(session.location, Location::Home, "{}", session.session_id);
    }
}

#[test]
fn normalization_is_exposed_for_reuse() {
    let normalized = normalize_availability(None, &[Location::Home]);
    assert_eq!(normalized.len(), 7);
}
