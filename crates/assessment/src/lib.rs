mod grades;
mod profile;
mod types;

pub use grades::{GRADE_ORDER, grade_gap, grade_index, is_known_grade};
pub use profile::compute_profile;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Unknown grade: {0}")]
    UnknownGrade(String),
}
