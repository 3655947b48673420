//! Schedule error types

use crate::api::ApiError;
use thiserror::Error;

/// Errors raised by the schedule model and registration flow
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Client-side gating failed, nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Time slot id not part of the schedule
    #[error("Time slot not found: {0}")]
    SlotNotFound(i64),

    /// Registration link could not be parsed
    #[error("Invalid registration link: {0}")]
    InvalidLink(String),

    /// Backend call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
