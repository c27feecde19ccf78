mod feedback;
mod outdoor;
mod report;
mod store;

pub use feedback::*;
pub use outdoor::*;
pub use report::*;
pub use store::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogbookError {
    #[error("Invalid log entry: {}", .0.join("; "))]
    InvalidEntry(Vec<String>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
