mod context;
mod generate;
mod tables;
mod types;

pub use context::{PhaseContext, current_phase_and_week, week_context};
pub use generate::{generate, validate_goal};
pub use tables::{PHASE_ORDER, session_pool};
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacrocycleError {
    #[error("Macrocycle has no phases")]
    NoPhases,

    #[error("week_num {week_num} exceeds macrocycle total weeks ({total_weeks})")]
    WeekOutOfRange { week_num: u32, total_weeks: u32 },

    #[error("total_weeks must be at least {minimum}, got {requested}")]
    TooFewWeeks { requested: u32, minimum: u32 },
}
