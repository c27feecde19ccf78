mod availability;
mod deload;
mod materialize;
mod types;

pub use availability::{Availability, DayAvailability, SlotInfo, SlotSpec, normalize_availability};
pub use deload::apply_deload_week;
pub use materialize::{MaterializeParams, PLAN_VERSION, materialize};
pub use types::*;
