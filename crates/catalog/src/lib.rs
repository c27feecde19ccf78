mod assets;
mod meta;
mod resolver;
mod types;

pub use assets::{list_sessions, load_exercises, load_session};
pub use meta::{SessionMeta, session_meta};
pub use resolver::resolve;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Corrupt catalog asset {path}: {source}")]
    CorruptAsset {
        path: String,
        source: serde_json::Error,
    },

    #[error("Missing catalog asset: {0}")]
    MissingAsset(String),
}
