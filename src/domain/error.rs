//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::pack::NodeId;

/// Errors raised while validating a hierarchy or computing a layout.
///
/// A failed pass never yields partial geometry: downstream arc math has no
/// safe fallback for NaN or undefined radii.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid hierarchy at '{path}': {reason}")]
    Validation { path: String, reason: String },

    #[error("degenerate layout: {0}")]
    DegenerateLayout(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the zoom state machine.
///
/// These are locally recoverable: a rejected call leaves the camera in its
/// prior state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransitionError {
    #[error("node {0} is not part of the packed tree")]
    UnknownNode(NodeId),

    #[error("a zoom transition is already in flight")]
    TransitionInFlight,
}

pub type TransitionResult<T> = Result<T, TransitionError>;
