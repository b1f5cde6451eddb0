//! Error type shared by the core and editor crates.
//!
//! Only caller mistakes are errors. Lookups of ids that have no position,
//! undersized selections and empty undo stacks are "nothing to do" states
//! and are reported through `Option`/`bool` instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PedigreeError {
    /// A required argument was absent or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Layout configuration could not be decoded.
    #[error("invalid layout config: {0}")]
    Config(#[from] serde_json::Error),
}

impl PedigreeError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T, E = PedigreeError> = std::result::Result<T, E>;
