use crate::availability::{Availability, SlotInfo, normalize_availability};
use crate::deload::apply_deload_week;
use crate::types::{
    DayPlan, Gym, PlanContext, PlanningPrefs, SessionSlot, WeekGroup, WeekPlan, WeekTargets,
};
use catalog::{SessionMeta, SessionTags, session_meta};
use chrono::{DateTime, Days, NaiveDate, Utc};
use macrocycle::{PhaseContext, PhaseId};
use shared::{Intensity, Location, Slot, SlotStatus, Weekday};
use std::collections::BTreeMap;

pub const PLAN_VERSION: &str = "planner.v2";

/// Test sessions injected on the closing week of strength-building
/// phases; bool marks the required ones.
const TEST_SCHEDULE: [(&str, bool); 3] = [
    ("test_max_hang_5s", true),
    ("test_repeater_7_3", true),
    ("test_max_weighted_pullup", false),
];

pub struct MaterializeParams<'a> {
    pub ctx: &'a PhaseContext,
    pub availability: Option<&'a Availability>,
    pub allowed_locations: &'a [Location],
    pub prefs: &'a PlanningPrefs,
    pub gyms: &'a [Gym],
    /// Dates inside a pre-trip deload window: hard/max work is blocked.
    pub pretrip_dates: &'a [NaiveDate],
    pub generated_at: DateTime<Utc>,
}

fn pick_location(
    session_locations: &[Location],
    slot_info: &SlotInfo,
    allowed: &[Location],
) -> Option<Location> {
    let mut viable: Vec<Location> = slot_info
        .locations
        .iter()
        .filter(|l| session_locations.contains(l) && allowed.contains(l))
        .copied()
        .collect();
    viable.sort();
    viable.dedup();
    if viable.is_empty() {
        return None;
    }
    match slot_info.preferred_location {
        // A location preference the session cannot satisfy disqualifies
        // the slot rather than silently relocating the session.
        Some(preferred) => viable.contains(&preferred).then_some(preferred),
        None => viable.first().copied(),
    }
}

fn select_gym_id(
    slot_info: &SlotInfo,
    default_gym_id: Option<&str>,
    gyms: &[Gym],
) -> Option<String> {
    if let Some(gym_id) = &slot_info.gym_id {
        return Some(gym_id.clone());
    }
    if let Some(default) = default_gym_id {
        return Some(default.to_string());
    }
    gyms.iter()
        .min_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.gym_id.cmp(&b.gym_id)))
        .map(|g| g.gym_id.clone())
}

fn is_primary(meta: &SessionMeta) -> bool {
    meta.hard || meta.climbing
}

/// Best available slot for a session on one day. Primary sessions prefer
/// the evening, complementary fillers the lunch break.
fn find_best_slot(
    day_slots: &BTreeMap<Slot, SlotInfo>,
    meta: &SessionMeta,
    allowed: &[Location],
    prefer_evening: bool,
) -> Option<(Slot, Location, SlotInfo)> {
    let order: [Slot; 3] = if prefer_evening {
        [Slot::Evening, Slot::Morning, Slot::Lunch]
    } else {
        [Slot::Lunch, Slot::Morning, Slot::Evening]
    };
    for slot in order {
        let info = &day_slots[&slot];
        if !info.available {
            continue;
        }
        if let Some(location) = pick_location(meta.locations, info, allowed) {
            return Some((slot, location, info.clone()));
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn make_entry(
    slot: Slot,
    session_id: &str,
    meta: &SessionMeta,
    location: Location,
    slot_info: &SlotInfo,
    phase_id: PhaseId,
    weekday: Weekday,
    default_gym_id: Option<&str>,
    gyms: &[Gym],
    pass_label: &str,
) -> SessionSlot {
    let gym_id = (location == Location::Gym)
        .then(|| select_gym_id(slot_info, default_gym_id, gyms))
        .flatten();
    SessionSlot {
        slot,
        session_id: session_id.to_string(),
        location,
        gym_id,
        phase_id: Some(phase_id),
        intensity: meta.intensity,
        estimated_load_score: Some(meta.intensity.estimated_load()),
        status: SlotStatus::Planned,
        tags: SessionTags {
            hard: meta.hard,
            finger: meta.finger,
        },
        constraints_applied: Vec::new(),
        explain: vec![
            format!("phase={}", phase_id),
            format!("slot={slot}"),
            format!("day={weekday}"),
            pass_label.to_string(),
        ],
    }
}

fn day_has_gym(day_slots: &BTreeMap<Slot, SlotInfo>) -> bool {
    day_slots.values().any(|info| {
        info.available
            && (info.preferred_location == Some(Location::Gym)
                || info.locations.contains(&Location::Gym))
    })
}

/// Materialize one week of the macrocycle into a concrete plan.
///
/// Deterministic by construction: the same inputs always produce the
/// same plan (modulo `generated_at`), which is what lets week fetches be
/// cached and only refreshed on an explicit force flag.
///
/// Three passes:
///   1. primary sessions (hard or climbing) under spacing constraints,
///   2. complementary fillers up to the target training-day count,
///   3. assessment test sessions on the last week of eligible phases.
pub fn materialize(params: &MaterializeParams) -> WeekPlan {
    let ctx = params.ctx;
    let mut allowed: Vec<Location> = params.allowed_locations.to_vec();
    if allowed.is_empty() {
        allowed = vec![Location::Home, Location::Gym];
    }
    allowed.sort();
    allowed.dedup();

    let normalized = normalize_availability(params.availability, &allowed);
    let cap = ctx.intensity_cap;
    let effective_hard_cap = if ctx.phase_id == PhaseId::Deload {
        0
    } else {
        params.prefs.hard_day_cap_per_week
    };
    let default_gym_id = params.prefs.default_gym_id.as_deref();
    let target_days = params.prefs.target_training_days_per_week as usize;

    let filtered_pool: Vec<&str> = ctx
        .session_pool
        .iter()
        .map(|s| s.as_str())
        .filter(|sid| session_meta(sid).intensity <= cap)
        .collect();
    let primary_pool: Vec<&str> = filtered_pool
        .iter()
        .copied()
        .filter(|sid| is_primary(&session_meta(sid)))
        .collect();
    let complementary_pool: Vec<&str> = filtered_pool
        .iter()
        .copied()
        .filter(|sid| !is_primary(&session_meta(sid)))
        .collect();

    let day_dates: Vec<NaiveDate> = (0..7)
        .map(|i| ctx.start_date + Days::new(i))
        .collect();
    let day_keys: Vec<Weekday> = day_dates.iter().map(|d| Weekday::from_date(*d)).collect();
    let mut day_sessions: Vec<Vec<SessionSlot>> = vec![Vec::new(); 7];

    let mut hard_days = 0u32;
    let mut finger_day_offsets: Vec<usize> = Vec::new();
    let mut hard_day_offsets: Vec<usize> = Vec::new();

    let mut day_available: Vec<bool> = day_keys
        .iter()
        .map(|wd| normalized[wd].values().any(|s| s.available))
        .collect();

    // Cap the number of training days to the target, keeping the days
    // that score best for climbing (gym access, evening slots).
    let available_count = day_available.iter().filter(|a| **a).count();
    if available_count > target_days {
        let mut day_scores: Vec<(i64, usize)> = Vec::new();
        for (offset, available) in day_available.iter().enumerate() {
            if !available {
                continue;
            }
            let mut score = 0i64;
            for (slot, info) in &normalized[&day_keys[offset]] {
                if !info.available {
                    continue;
                }
                let gym_preferred = info.preferred_location == Some(Location::Gym)
                    || (info.preferred_location.is_none()
                        && info.locations.contains(&Location::Gym));
                if gym_preferred {
                    score += 100;
                } else if info.locations.contains(&Location::Gym) {
                    score += 50;
                } else {
                    score += 1;
                }
                if *slot == Slot::Evening {
                    score += 10;
                }
            }
            day_scores.push((score, offset));
        }
        day_scores.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let keep: Vec<usize> = day_scores.iter().take(target_days).map(|x| x.1).collect();
        for (offset, available) in day_available.iter_mut().enumerate() {
            if !keep.contains(&offset) {
                *available = false;
            }
        }
    }

    // ── PASS 1: primary sessions, gym-capable days first ──
    let mut pass1_order: Vec<usize> = (0..7).filter(|o| day_available[*o]).collect();
    pass1_order.sort_by_key(|o| (if day_has_gym(&normalized[&day_keys[*o]]) { 0 } else { 1 }, *o));

    let mut primary_idx = 0usize;
    let mut primary_uses = 0usize;
    let max_primary_uses = primary_pool.len() * 2;

    for offset in pass1_order {
        if primary_pool.is_empty() || primary_uses >= max_primary_uses {
            break;
        }
        let mut attempts = 0usize;
        while attempts < primary_pool.len() && primary_uses < max_primary_uses {
            let sid = primary_pool[primary_idx % primary_pool.len()];
            let meta = session_meta(sid);

            let pretrip_blocked = params.pretrip_dates.contains(&day_dates[offset])
                && (meta.hard || meta.intensity == Intensity::Max);
            let over_cap = meta.hard && hard_days >= effective_hard_cap;
            let finger_too_close = meta.finger
                && finger_day_offsets
                    .last()
                    .is_some_and(|last| offset.saturating_sub(*last) <= 1);
            let hard_too_close = meta.hard
                && hard_day_offsets
                    .last()
                    .is_some_and(|last| offset.saturating_sub(*last) <= 1);

            if pretrip_blocked || over_cap || finger_too_close || hard_too_close {
                primary_idx += 1;
                primary_uses += 1;
                attempts += 1;
                continue;
            }

            let Some((slot, location, slot_info)) =
                find_best_slot(&normalized[&day_keys[offset]], &meta, &allowed, true)
            else {
                primary_idx += 1;
                primary_uses += 1;
                attempts += 1;
                continue;
            };

            day_sessions[offset].push(make_entry(
                slot,
                sid,
                &meta,
                location,
                &slot_info,
                ctx.phase_id,
                day_keys[offset],
                default_gym_id,
                params.gyms,
                "pass1:primary",
            ));
            primary_idx += 1;
            primary_uses += 1;
            if meta.hard {
                hard_days += 1;
                hard_day_offsets.push(offset);
            }
            if meta.finger {
                finger_day_offsets.push(offset);
            }
            break;
        }
    }

    // ── PASS 2: complementary fillers on the remaining days ──
    let mut days_with_sessions = day_sessions.iter().filter(|d| !d.is_empty()).count();
    let mut comp_idx = 0usize;
    let mut comp_uses = 0usize;
    let max_comp_uses = complementary_pool.len() * 2;

    for offset in 0..7 {
        if days_with_sessions >= target_days
            || complementary_pool.is_empty()
            || comp_uses >= max_comp_uses
        {
            break;
        }
        if !day_sessions[offset].is_empty() || !day_available[offset] {
            continue;
        }
        let mut attempts = 0usize;
        while attempts < complementary_pool.len() && comp_uses < max_comp_uses {
            let sid = complementary_pool[comp_idx % complementary_pool.len()];
            let meta = session_meta(sid);
            let Some((slot, location, slot_info)) =
                find_best_slot(&normalized[&day_keys[offset]], &meta, &allowed, false)
            else {
                comp_idx += 1;
                comp_uses += 1;
                attempts += 1;
                continue;
            };
            day_sessions[offset].push(make_entry(
                slot,
                sid,
                &meta,
                location,
                &slot_info,
                ctx.phase_id,
                day_keys[offset],
                default_gym_id,
                params.gyms,
                "pass2:complementary",
            ));
            comp_idx += 1;
            comp_uses += 1;
            days_with_sessions += 1;
            break;
        }
    }

    // ── PASS 3: assessment tests on the closing week of eligible phases ──
    if ctx.is_last_week_of_phase
        && matches!(ctx.phase_id, PhaseId::Base | PhaseId::StrengthPower)
    {
        let mut test_offsets: Vec<usize> = Vec::new();
        for (test_sid, _required) in TEST_SCHEDULE {
            let test_meta = session_meta(test_sid);
            for offset in 0..7 {
                if test_offsets.contains(&offset) || day_sessions[offset].is_empty() {
                    continue;
                }
                let day_has_finger = day_sessions[offset]
                    .iter()
                    .any(|e| session_meta(&e.session_id).finger);
                let day_has_hard = day_sessions[offset]
                    .iter()
                    .any(|e| session_meta(&e.session_id).hard);
                // Spacing holds unless the test replaces a session that
                // already occupies the same constraint slot.
                if test_meta.finger
                    && !day_has_finger
                    && finger_day_offsets.iter().any(|fo| offset.abs_diff(*fo) <= 1)
                {
                    continue;
                }
                if test_meta.hard
                    && !day_has_hard
                    && hard_day_offsets.iter().any(|ho| offset.abs_diff(*ho) <= 1)
                {
                    continue;
                }
                if test_meta.hard && !day_has_hard && hard_days >= effective_hard_cap {
                    continue;
                }
                let Some((slot, location, slot_info)) =
                    find_best_slot(&normalized[&day_keys[offset]], &test_meta, &allowed, true)
                else {
                    continue;
                };

                // Replace a complementary session when there is one, the
                // last session otherwise.
                let replace_idx = day_sessions[offset]
                    .iter()
                    .position(|e| !is_primary(&session_meta(&e.session_id)))
                    .unwrap_or(day_sessions[offset].len() - 1);
                let old_meta = session_meta(&day_sessions[offset][replace_idx].session_id);
                day_sessions[offset][replace_idx] = make_entry(
                    slot,
                    test_sid,
                    &test_meta,
                    location,
                    &slot_info,
                    ctx.phase_id,
                    day_keys[offset],
                    default_gym_id,
                    params.gyms,
                    "pass3:test_session",
                );
                if test_meta.hard && !old_meta.hard {
                    hard_days += 1;
                    hard_day_offsets.push(offset);
                }
                if test_meta.finger && !old_meta.finger {
                    finger_day_offsets.push(offset);
                }
                test_offsets.push(offset);
                break;
            }
        }
    }

    let finger_days_count = finger_day_offsets.len() as u32;
    let mut days = Vec::with_capacity(7);
    for (offset, sessions) in day_sessions.into_iter().enumerate() {
        let mut sessions = sessions;
        SessionSlot::sort_sessions(&mut sessions);
        let mut day = DayPlan {
            date: day_dates[offset],
            weekday: day_keys[offset],
            status: Default::default(),
            sessions,
            pretrip_deload: params.pretrip_dates.contains(&day_dates[offset]),
        };
        day.roll_up_status();
        days.push(day);
    }

    let mut plan = WeekPlan {
        plan_version: PLAN_VERSION.to_string(),
        generated_at: params.generated_at.to_rfc3339(),
        start_date: ctx.start_date,
        profile_snapshot: PlanContext {
            phase_id: ctx.phase_id,
            domain_weights: ctx.domain_weights.clone(),
            intensity_cap: cap,
            allowed_locations: allowed,
            hard_cap_per_week: effective_hard_cap,
            default_gym_id: default_gym_id.map(|s| s.to_string()),
        },
        weekly_load_summary: Default::default(),
        weeks: vec![WeekGroup {
            week_index: 1,
            phase: ctx.phase_id,
            targets: WeekTargets {
                hard_days: effective_hard_cap,
                finger_days: finger_days_count,
                deload_factor: if ctx.phase_id == PhaseId::Deload { 0.5 } else { 1.0 },
            },
            days,
        }],
        adaptations: Vec::new(),
        plan_revision: 1,
    };

    if ctx.phase_id == PhaseId::Deload {
        apply_deload_week(&mut plan);
    }
    plan.refresh_load_summary();
    plan
}
