use crate::reconcile::reconcile;
use crate::ReplanError;
use catalog::{SessionTags, session_meta};
use chrono::NaiveDate;
use planner::{Adaptation, DayPlan, SessionSlot, WeekPlan};
use serde::{Deserialize, Serialize};
use shared::{Location, Slot, SlotStatus, StatusEvent};

/// Client-issued mutation events against a week plan.
///
/// Status events (`mark_done`, `mark_skipped`, `undo`) touch exactly one
/// slot and its owning day; replaying one against an already-finalized
/// slot is a no-op. `move_session` restructures the week and triggers a
/// reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    MarkDone {
        date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<Slot>,
    },
    MarkSkipped {
        date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<Slot>,
    },
    Undo {
        date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<Slot>,
    },
    MoveSession {
        from_date: NaiveDate,
        to_date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_slot: Option<Slot>,
        to_slot: Slot,
    },
}

fn session_matches(session: &SessionSlot, session_ref: Option<&str>, slot: Option<Slot>) -> bool {
    if let Some(session_ref) = session_ref {
        if session.session_id != session_ref {
            return false;
        }
    }
    if let Some(slot) = slot {
        if session.slot != slot {
            return false;
        }
    }
    true
}

fn apply_status_event(
    plan: &mut WeekPlan,
    date: NaiveDate,
    session_ref: Option<&str>,
    slot: Option<Slot>,
    trigger: StatusEvent,
) -> Result<(), ReplanError> {
    let day = plan
        .day_mut(date)
        .ok_or(ReplanError::DateNotInPlan(date))?;
    let session = day
        .sessions
        .iter_mut()
        .find(|s| session_matches(s, session_ref, slot))
        .ok_or_else(|| ReplanError::SessionNotFound {
            date,
            session_ref: session_ref.map(|s| s.to_string()),
            slot,
        })?;
    session.status = session.status.apply(trigger);
    day.roll_up_status();
    Ok(())
}

fn extract_session(
    day: &mut DayPlan,
    date: NaiveDate,
    session_ref: Option<&str>,
    slot: Option<Slot>,
) -> Result<SessionSlot, ReplanError> {
    let idx = day
        .sessions
        .iter()
        .position(|s| session_matches(s, session_ref, slot))
        .ok_or_else(|| ReplanError::SessionNotFound {
            date,
            session_ref: session_ref.map(|s| s.to_string()),
            slot,
        })?;
    Ok(day.sessions.remove(idx))
}

fn insert_or_replace(day: &mut DayPlan, mut moved: SessionSlot, to_slot: Slot) {
    moved.slot = to_slot;
    if let Some(existing) = day.sessions.iter_mut().find(|s| s.slot == to_slot) {
        *existing = moved;
    } else {
        day.sessions.push(moved);
    }
    SessionSlot::sort_sessions(&mut day.sessions);
}

/// Deterministic conservative fill for a slot vacated by a move: an
/// accessory session if the day still carries hard work, easy recovery
/// otherwise.
fn build_fill_session(plan: &WeekPlan, date: NaiveDate, slot: Slot) -> SessionSlot {
    let day = plan.day(date);
    let day_sessions = day.map(|d| d.sessions.as_slice()).unwrap_or(&[]);
    let has_hard = day_sessions.iter().any(|s| s.tags.hard);
    let session_id = if has_hard {
        "complementary_conditioning"
    } else {
        "regeneration_easy"
    };
    let meta = session_meta(session_id);

    let gym = day_sessions.iter().any(|s| s.location == Location::Gym);
    let (location, gym_id) = if gym {
        (Location::Gym, plan.profile_snapshot.default_gym_id.clone())
    } else {
        (Location::Home, None)
    };

    SessionSlot {
        slot,
        session_id: session_id.to_string(),
        location,
        gym_id,
        phase_id: Some(plan.profile_snapshot.phase_id),
        intensity: meta.intensity,
        estimated_load_score: Some(meta.intensity.estimated_load()),
        status: SlotStatus::Planned,
        tags: SessionTags {
            hard: meta.hard,
            finger: meta.finger,
        },
        constraints_applied: vec!["replanner_fill".to_string()],
        explain: vec![
            "deterministic refill".to_string(),
            format!("fill_kind={}", if has_hard { "accessory" } else { "recovery" }),
        ],
    }
}

/// Apply a batch of events to a caller-supplied plan, returning the
/// updated document. The input plan is not mutated.
pub fn apply_events(plan: &WeekPlan, events: &[Event]) -> Result<WeekPlan, ReplanError> {
    let mut updated = plan.clone();
    let mut structural = false;

    for event in events {
        match event {
            Event::MarkDone { date, session_ref, slot } => {
                apply_status_event(
                    &mut updated,
                    *date,
                    session_ref.as_deref(),
                    *slot,
                    StatusEvent::MarkDone,
                )?;
            }
            Event::MarkSkipped { date, session_ref, slot } => {
                apply_status_event(
                    &mut updated,
                    *date,
                    session_ref.as_deref(),
                    *slot,
                    StatusEvent::MarkSkipped,
                )?;
            }
            Event::Undo { date, session_ref, slot } => {
                apply_status_event(
                    &mut updated,
                    *date,
                    session_ref.as_deref(),
                    *slot,
                    StatusEvent::Undo,
                )?;
            }
            Event::MoveSession {
                from_date,
                to_date,
                session_ref,
                from_slot,
                to_slot,
            } => {
                let from_day = updated
                    .day_mut(*from_date)
                    .ok_or(ReplanError::DateNotInPlan(*from_date))?;
                let moved =
                    extract_session(from_day, *from_date, session_ref.as_deref(), *from_slot)?;
                let vacated_slot = *from_slot;
                {
                    let to_day = updated
                        .day_mut(*to_date)
                        .ok_or(ReplanError::DateNotInPlan(*to_date))?;
                    insert_or_replace(to_day, moved, *to_slot);
                }
                if let Some(vacated_slot) = vacated_slot {
                    let occupied = updated
                        .day(*from_date)
                        .map(|d| d.sessions.iter().any(|s| s.slot == vacated_slot))
                        .unwrap_or(true);
                    if !occupied {
                        let fill = build_fill_session(&updated, *from_date, vacated_slot);
                        if let Some(from_day) = updated.day_mut(*from_date) {
                            from_day.sessions.push(fill);
                            SessionSlot::sort_sessions(&mut from_day.sessions);
                        }
                    }
                }
                for date in [*from_date, *to_date] {
                    if let Some(day) = updated.day_mut(date) {
                        day.roll_up_status();
                    }
                }
                structural = true;
            }
        }

        if let Ok(value) = serde_json::to_value(event) {
            updated.adaptations.push(Adaptation::Event { event: value });
        }
    }

    if structural {
        reconcile(&mut updated);
        updated.refresh_load_summary();
    }
    updated.plan_revision += 1;
    Ok(updated)
}
