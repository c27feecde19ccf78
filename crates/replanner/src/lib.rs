mod events;
mod merge;
mod override_day;
mod quick_add;
mod reconcile;
mod suggest;

pub use events::{Event, apply_events};
pub use merge::merge_preserved;
pub use override_day::{Intent, OverrideRequest, apply_override};
pub use quick_add::{QuickAddRequest, quick_add};
pub use suggest::{Suggestion, suggest};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplanError {
    #[error("Date not present in plan: {0}")]
    DateNotInPlan(chrono::NaiveDate),

    #[error("Session not found for day={date} session_ref={session_ref:?} slot={slot:?}")]
    SessionNotFound {
        date: chrono::NaiveDate,
        session_ref: Option<String>,
        slot: Option<shared::Slot>,
    },

    #[error("Slot '{slot}' already occupied on {date}")]
    SlotOccupied {
        date: chrono::NaiveDate,
        slot: shared::Slot,
    },
}
