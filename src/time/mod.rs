//! Instants and durations bound to a calendar.

pub mod span;
pub mod timestamp;

pub use span::TimeSpan;
pub use timestamp::Timestamp;
