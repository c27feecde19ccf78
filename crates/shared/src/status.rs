use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle of a scheduled session.
///
/// `planned → done` and `planned → skipped` happen through events;
/// leaving a finalized state requires an explicit undo. There is no
/// direct `done ↔ skipped` transition, so a replayed or conflicting
/// event can never flip a finalized slot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Planned,
    Done,
    Skipped,
}

/// Status transition triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusEvent {
    MarkDone,
    MarkSkipped,
    Undo,
}

impl SlotStatus {
    pub fn is_finalized(self) -> bool {
        matches!(self, SlotStatus::Done | SlotStatus::Skipped)
    }

    /// Apply a status event. Guarded: events that would move a slot
    /// between finalized states, or re-finalize an already-finalized
    /// slot, are no-ops rather than errors.
    pub fn apply(self, event: StatusEvent) -> SlotStatus {
        match (self, event) {
            (SlotStatus::Planned, StatusEvent::MarkDone) => SlotStatus::Done,
            (SlotStatus::Planned, StatusEvent::MarkSkipped) => SlotStatus::Skipped,
            (SlotStatus::Done | SlotStatus::Skipped, StatusEvent::Undo) => SlotStatus::Planned,
            (current, _) => current,
        }
    }
}

/// Day-level status, rolled up from the day's session statuses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DayStatus {
    #[default]
    Planned,
    Done,
    Skipped,
}

impl DayStatus {
    /// Roll-up rule: a day is done once every session is finalized and at
    /// least one is done; skipped only when all sessions are skipped;
    /// otherwise (including rest days) it stays planned.
    pub fn roll_up<I: IntoIterator<Item = SlotStatus>>(statuses: I) -> DayStatus {
        let mut total = 0usize;
        let mut done = 0usize;
        let mut skipped = 0usize;
        for status in statuses {
            total += 1;
            match status {
                SlotStatus::Done => done += 1,
                SlotStatus::Skipped => skipped += 1,
                SlotStatus::Planned => {}
            }
        }
        if total == 0 {
            DayStatus::Planned
        } else if skipped == total {
            DayStatus::Skipped
        } else if done + skipped == total {
            DayStatus::Done
        } else {
            DayStatus::Planned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planned_transitions() {
        assert_eq!(SlotStatus::Planned.apply(StatusEvent::MarkDone), SlotStatus::Done);
        assert_eq!(SlotStatus::Planned.apply(StatusEvent::MarkSkipped), SlotStatus::Skipped);
        assert_eq!(SlotStatus::Planned.apply(StatusEvent::Undo), SlotStatus::Planned);
    }

    #[test]
    fn finalized_states_ignore_conflicting_events() {
        assert_eq!(SlotStatus::Done.apply(StatusEvent::MarkSkipped), SlotStatus::Done);
        assert_eq!(SlotStatus::Done.apply(StatusEvent::MarkDone), SlotStatus::Done);
        assert_eq!(SlotStatus::Skipped.apply(StatusEvent::MarkDone), SlotStatus::Skipped);
    }

    #[test]
    fn undo_returns_to_planned() {
        assert_eq!(SlotStatus::Done.apply(StatusEvent::Undo), SlotStatus::Planned);
        assert_eq!(SlotStatus::Skipped.apply(StatusEvent::Undo), SlotStatus::Planned);
    }

    #[test]
    fn roll_up_rules() {
        use SlotStatus::*;
        assert_eq!(DayStatus::roll_up([]), DayStatus::Planned);
        assert_eq!(DayStatus::roll_up([Planned, Done]), DayStatus::Planned);
        assert_eq!(DayStatus::roll_up([Done, Skipped]), DayStatus::Done);
        assert_eq!(DayStatus::roll_up([Done, Done]), DayStatus::Done);
        assert_eq!(DayStatus::roll_up([Skipped, Skipped]), DayStatus::Skipped);
    }
}
