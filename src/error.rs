//! Error types shared by the calendar, event and campaign layers.

use thiserror::Error;

use crate::calendar::Interval;

/// Everything that can go wrong while building timestamps, events or
/// replaying a campaign timeline.
#[derive(Debug, Error)]
pub enum DecampError {
    /// Arithmetic is not defined for this unit (e.g. adding "time of day").
    #[error("cannot add {unit} to a {calendar} timestamp")]
    InvalidUnit { unit: Interval, calendar: String },

    /// Date components that do not exist in the calendar.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("unknown calendar: {0}")]
    UnknownCalendar(String),

    #[error("unknown ruleset: {0}")]
    UnknownRuleset(String),

    /// A revert that does not match what the paired apply did.
    #[error("inconsistent revert: {0}")]
    InconsistentRevert(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("cannot adjust boolean attribute '{0}'")]
    BooleanAttributeNotAdjustable(String),

    #[error("attribute '{key}' is {expected} and cannot be adjusted by a {found}")]
    AttributeTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("adjusting attribute '{0}' overflows")]
    AttributeOverflow(String),

    /// Sub-event links that would not form a tree.
    #[error("invalid event tree: {0}")]
    InvalidEventTree(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DecampError>;
