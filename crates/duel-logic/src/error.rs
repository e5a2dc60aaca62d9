//! Boundary validation errors

use thiserror::Error;

/// Input rejected at the edge of the engine.
///
/// A submission refused by the gate is not an error; see
/// [`MatchController::submit_action`](crate::MatchController::submit_action).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown action tag: {0:?}")]
    UnknownAction(String),

    #[error("action index {0} out of range")]
    ActionIndex(usize),

    #[error("invalid config field `{field}`: {reason}")]
    Config { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
