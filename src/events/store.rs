//! Flat event arena keyed by id.

use std::collections::BTreeMap;

use tracing::debug;

use crate::campaign::CampaignState;
use crate::error::{DecampError, Result};
use crate::time::Timestamp;
use super::event::{Event, EventUndo, ResultUndo};
use super::{EventId, IdGenerator, ResultRef};

#[derive(Clone, Debug, Default)]
pub struct EventStore {
    events: BTreeMap<EventId, Event>,
    ids: IdGenerator,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `event` and assign it an id.
    pub fn insert(&mut self, mut event: Event) -> Result<EventId> {
        if event.parent.is_some() || event.timestamp.is_some() {
            return Err(DecampError::InvalidEventTree(
                "a new event cannot already be nested or scheduled".to_string(),
            ));
        }
        if event.results.iter().any(|r| r.sub_event.is_some()) {
            return Err(DecampError::InvalidEventTree(
                "attach nested events through the store".to_string(),
            ));
        }
        let id = EventId(self.ids.next_id());
        event.id = Some(id);
        self.events.insert(id, event);
        Ok(id)
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn require(&self, id: EventId) -> Result<&Event> {
        self.get(id)
            .ok_or_else(|| DecampError::KeyNotFound(id.to_string()))
    }

    /// Top-level event of the tree containing `id`.
    pub fn root_of(&self, id: EventId) -> Result<EventId> {
        let mut current = id;
        for _ in 0..=self.events.len() {
            match self.require(current)?.parent {
                Some(parent) => current = parent.event,
                None => return Ok(current),
            }
        }
        Err(DecampError::InvalidEventTree(format!("{} sits in a cycle", id)))
    }

    /// Nest `sub` under the result at `owner`.
    ///
    /// Only unscheduled trees can be rearranged; `sub` must be a free
    /// top-level event that is not an ancestor of `owner`.
    pub fn attach_sub_event(&mut self, owner: ResultRef, sub: EventId) -> Result<()> {
        let owner_root = self.root_of(owner.event)?;
        if self.require(owner_root)?.timestamp.is_some() {
            return Err(DecampError::InvalidEventTree(format!(
                "{} is already scheduled",
                owner_root
            )));
        }
        let nested = self.require(sub)?;
        if nested.parent.is_some() || nested.timestamp.is_some() {
            return Err(DecampError::InvalidEventTree(format!(
                "{} is already nested or scheduled",
                sub
            )));
        }
        if owner_root == sub {
            return Err(DecampError::InvalidEventTree(format!(
                "{} cannot be nested inside itself",
                sub
            )));
        }
        let result = self
            .require(owner.event)?
            .results
            .get(owner.index)
            .ok_or_else(|| DecampError::KeyNotFound(owner.to_string()))?;
        if result.sub_event.is_some() {
            return Err(DecampError::InvalidEventTree(format!("{} already has a nested event", owner)));
        }

        if let Some(event) = self.events.get_mut(&owner.event) {
            event.results[owner.index].sub_event = Some(sub);
        }
        if let Some(event) = self.events.get_mut(&sub) {
            event.parent = Some(owner);
        }
        Ok(())
    }

    /// Drop a free event: not scheduled, not nested and with no nested
    /// events of its own. Anything else stays put.
    pub(crate) fn discard(&mut self, id: EventId) -> Option<Event> {
        let event = self.events.get(&id)?;
        if event.timestamp.is_some()
            || event.parent.is_some()
            || event.results.iter().any(|r| r.sub_event.is_some())
        {
            return None;
        }
        self.events.remove(&id)
    }

    /// Mark a top-level event as scheduled at `timestamp`.
    pub(crate) fn schedule(&mut self, id: EventId, timestamp: &Timestamp) -> Result<()> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or_else(|| DecampError::KeyNotFound(id.to_string()))?;
        if event.parent.is_some() {
            return Err(DecampError::InvalidEventTree(format!("{} is nested in another event", id)));
        }
        if event.timestamp.is_some() {
            return Err(DecampError::InvalidEventTree(format!("{} is already scheduled", id)));
        }
        event.timestamp = Some(timestamp.clone());
        Ok(())
    }

    /// Apply the event's results in order, each nested event right after
    /// its owning result.
    pub fn apply(&self, id: EventId, state: &mut CampaignState, include_virtual: bool) -> Result<EventUndo> {
        let event = self.require(id)?;
        if event.is_virtual && !include_virtual {
            debug!(event = %id, "skipping virtual event");
            return Ok(EventUndo::Skipped);
        }
        let mut undo = Vec::with_capacity(event.results.len());
        for result in &event.results {
            let token = result.apply(state)?;
            let sub_event = match result.sub_event {
                Some(sub) => Some(self.apply(sub, state, include_virtual)?),
                None => None,
            };
            undo.push(ResultUndo { token, sub_event });
        }
        debug!(event = %id, results = undo.len(), "applied event");
        Ok(EventUndo::Applied(undo))
    }

    /// Exact inverse of [`EventStore::apply`]: results in reverse order,
    /// each nested event before its owning result.
    pub fn revert(&self, id: EventId, state: &mut CampaignState, undo: EventUndo) -> Result<()> {
        let event = self.require(id)?;
        let undo = match undo {
            EventUndo::Skipped => return Ok(()),
            EventUndo::Applied(undo) => undo,
        };
        if undo.len() != event.results.len() {
            return Err(DecampError::InconsistentRevert(format!(
                "{} has {} results but {} undo entries",
                id,
                event.results.len(),
                undo.len()
            )));
        }
        for (result, entry) in event.results.iter().zip(undo).rev() {
            match (result.sub_event, entry.sub_event) {
                (Some(sub), Some(sub_undo)) => self.revert(sub, state, sub_undo)?,
                (None, None) => {}
                _ => {
                    return Err(DecampError::InconsistentRevert(format!(
                        "nested event of {} changed since it was applied",
                        id
                    )))
                }
            }
            result.revert(state, entry.token)?;
        }
        debug!(event = %id, "reverted event");
        Ok(())
    }
}
