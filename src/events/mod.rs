//! Campaign events and their reversible results.
//!
//! Events live in a flat [`EventStore`] and refer to each other by id.
//! Applying an event returns an [`EventUndo`] that is the only way to
//! revert it again.

pub mod event;
pub mod result;
pub mod store;

use std::fmt;
use serde::{Serialize, Deserialize};

pub use event::{Event, EventUndo, ResultUndo};
pub use result::{AttributeMod, EventResult, ModUndo, ResultAction, UndoToken};
pub use store::EventStore;

// =============================================================================
// ID TYPES
// =============================================================================

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(EventId);

/// Monotonic id source.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A result inside an event, addressed by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRef {
    pub event: EventId,
    pub index: usize,
}

impl fmt::Display for ResultRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.event, self.index)
    }
}
