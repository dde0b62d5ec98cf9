//! Events: an ordered list of results plus who may see and edit them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::time::{TimeSpan, Timestamp};
use super::result::{EventResult, UndoToken};
use super::{EventId, ResultRef};

#[derive(Clone, Debug)]
pub struct Event {
    pub(crate) id: Option<EventId>,
    pub event_type: String,
    pub owner: Option<String>,
    pub(crate) parent: Option<ResultRef>,
    pub(crate) timestamp: Option<Timestamp>,
    pub duration: Option<TimeSpan>,
    /// `None` means everyone.
    pub viewers: Option<BTreeSet<String>>,
    /// `None` means everyone.
    pub editors: Option<BTreeSet<String>>,
    pub title: String,
    pub description: String,
    pub notes: String,
    /// Plans and hypotheticals; skipped by replay unless the campaign
    /// includes virtual events.
    pub is_virtual: bool,
    pub created_at: DateTime<Utc>,
    pub results: Vec<EventResult>,
}

impl Event {
    pub fn new(event_type: &str, creator: &str) -> Self {
        Self {
            id: None,
            event_type: event_type.to_string(),
            owner: Some(creator.to_string()),
            parent: None,
            timestamp: None,
            duration: None,
            viewers: None,
            editors: None,
            title: String::new(),
            description: String::new(),
            notes: String::new(),
            is_virtual: false,
            created_at: Utc::now(),
            results: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_duration(mut self, duration: TimeSpan) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_result(mut self, result: EventResult) -> Self {
        self.results.push(result);
        self
    }

    pub fn virtual_event(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn visible_to(mut self, players: &[&str]) -> Self {
        self.viewers = Some(players.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn editable_by(mut self, players: &[&str]) -> Self {
        self.editors = Some(players.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn add_result(&mut self, result: EventResult) {
        self.results.push(result);
    }

    /// Assigned when the event enters a store.
    pub fn id(&self) -> Option<EventId> {
        self.id
    }

    /// Owning result, for nested events.
    pub fn parent(&self) -> Option<ResultRef> {
        self.parent
    }

    /// When the event ends; set once it is scheduled.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    pub fn start(&self) -> Option<Timestamp> {
        match (&self.timestamp, &self.duration) {
            (Some(end), Some(duration)) => Some(end - duration),
            _ => None,
        }
    }

    // -- permissions ----------------------------------------------------------

    fn is_owner(&self, player: &str) -> bool {
        self.owner.as_deref() == Some(player)
    }

    pub fn can_view(&self, player: &str, gm: &str) -> bool {
        self.is_owner(player)
            || player == gm
            || self.viewers.as_ref().map_or(true, |v| v.contains(player))
    }

    pub fn can_view_notes(&self, player: &str) -> bool {
        self.is_owner(player)
    }

    pub fn can_edit(&self, player: &str, gm: &str) -> bool {
        self.is_owner(player)
            || player == gm
            || self.editors.as_ref().map_or(true, |e| e.contains(player))
    }

    pub fn can_assign(&self, player: &str, gm: &str) -> bool {
        player == gm
    }

    pub fn can_claim(&self) -> bool {
        self.owner.is_none()
    }

    pub fn can_set_permissions(&self, player: &str, gm: &str) -> bool {
        self.is_owner(player) || player == gm
    }
}

/// Undo data for one applied result and its nested event.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultUndo {
    pub token: UndoToken,
    pub sub_event: Option<EventUndo>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventUndo {
    /// Virtual event left out of the replay.
    Skipped,
    Applied(Vec<ResultUndo>),
}
