//! Campaign tracking for tabletop role-playing games.
//!
//! Fictional calendars, calendar-bound timestamps, and an event-sourced
//! timeline that replays the party's state to any instant.

pub mod calendar;
pub mod campaign;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod party;
pub mod ruleset;
pub mod scenario;
pub mod time;

pub use calendar::{Calendar, CalendarRegistry, DateParts, Interval};
pub use campaign::{Campaign, CampaignState};
pub use error::{DecampError, Result};
pub use time::{TimeSpan, Timestamp};
