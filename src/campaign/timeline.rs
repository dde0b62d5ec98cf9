//! Event-sourced timeline.
//!
//! Scheduled events sit in buckets keyed by their exact instant; bucket
//! order is insertion order. A [`Replay`] is a materialized state plus the
//! undo tokens of every event applied to it, and is walked forward or
//! backward one bucket at a time. A bucket that fails part-way leaves the
//! replay at the bucket boundary it started from.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use tracing::{debug, warn};

use crate::error::{DecampError, Result};
use crate::events::{Event, EventId, EventStore, EventUndo};
use crate::time::Timestamp;
use super::state::CampaignState;

#[derive(Clone, Debug)]
pub struct Replay {
    pub state: CampaignState,
    undo: HashMap<EventId, EventUndo>,
}

impl Replay {
    /// Empty state positioned at `timestamp`; nothing is applied.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            state: CampaignState::new(timestamp),
            undo: HashMap::new(),
        }
    }

    /// Whether `id` is currently applied.
    pub fn is_applied(&self, id: EventId) -> bool {
        self.undo.contains_key(&id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    pub store: EventStore,
    buckets: BTreeMap<Timestamp, Vec<EventId>>,
    include_virtual: bool,
}

impl Timeline {
    pub fn new(include_virtual: bool) -> Self {
        Self {
            store: EventStore::new(),
            buckets: BTreeMap::new(),
            include_virtual,
        }
    }

    pub fn include_virtual(&self) -> bool {
        self.include_virtual
    }

    /// Scheduled instants in order.
    pub fn instants(&self) -> impl Iterator<Item = &Timestamp> {
        self.buckets.keys()
    }

    pub fn bucket(&self, timestamp: &Timestamp) -> &[EventId] {
        self.buckets.get(timestamp).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    pub fn events_at(&self, timestamp: &Timestamp) -> Vec<&Event> {
        self.bucket(timestamp)
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    /// Events scheduled in `[start, end]`, in replay order.
    pub fn events_between(&self, start: &Timestamp, end: &Timestamp) -> Vec<&Event> {
        if start > end {
            return Vec::new();
        }
        self.buckets
            .range::<Timestamp, _>((Bound::Included(start), Bound::Included(end)))
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    /// Append a stored top-level event to the bucket at `timestamp`.
    /// The caller is responsible for bringing replays up to date.
    pub fn schedule(&mut self, timestamp: &Timestamp, id: EventId) -> Result<()> {
        self.store.schedule(id, timestamp)?;
        self.buckets.entry(timestamp.clone()).or_default().push(id);
        Ok(())
    }

    /// Take a just-scheduled event back out of its bucket.
    pub(crate) fn unschedule(&mut self, timestamp: &Timestamp, id: EventId) {
        if let Some(ids) = self.buckets.get_mut(timestamp) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.buckets.remove(timestamp);
            }
        }
        if let Some(event) = self.store.get_mut(id) {
            event.timestamp = None;
        }
    }

    /// Apply every bucket in `(replay.state.timestamp, t]`, oldest first.
    pub fn advance(&self, replay: &mut Replay, t: &Timestamp) -> Result<()> {
        if replay.state.timestamp >= *t {
            return Ok(());
        }
        let range = (Bound::Excluded(&replay.state.timestamp), Bound::Included(t));
        let due: Vec<(Timestamp, Vec<EventId>)> = self
            .buckets
            .range::<Timestamp, _>(range)
            .map(|(ts, ids)| (ts.clone(), ids.clone()))
            .collect();
        for (ts, ids) in due {
            self.apply_bucket(replay, &ids)?;
            debug!(at = %ts, events = ids.len(), "applied bucket");
            replay.state.timestamp = ts;
        }
        replay.state.timestamp = t.clone();
        Ok(())
    }

    /// Revert every bucket in `(t, replay.state.timestamp]`, newest first.
    pub fn rewind(&self, replay: &mut Replay, t: &Timestamp) -> Result<()> {
        if replay.state.timestamp <= *t {
            return Ok(());
        }
        let range = (Bound::Excluded(t), Bound::Included(&replay.state.timestamp));
        let due: Vec<(Timestamp, Vec<EventId>)> = self
            .buckets
            .range::<Timestamp, _>(range)
            .rev()
            .map(|(ts, ids)| (ts.clone(), ids.clone()))
            .collect();
        for (ts, ids) in due {
            self.revert_bucket(replay, &ids)?;
            debug!(at = %ts, events = ids.len(), "reverted bucket");
            // the instant just before this bucket is the latest still applied
            replay.state.timestamp = self
                .buckets
                .range::<Timestamp, _>((Bound::Excluded(t), Bound::Excluded(&ts)))
                .next_back()
                .map(|(prev, _)| prev.clone())
                .unwrap_or_else(|| t.clone());
        }
        replay.state.timestamp = t.clone();
        Ok(())
    }

    /// Apply one event that was just appended to the bucket at the
    /// replay's current instant.
    pub(crate) fn apply_single(&self, replay: &mut Replay, id: EventId) -> Result<()> {
        self.apply_bucket(replay, &[id])
    }

    /// Replay from an empty state up to `t`.
    pub fn materialize(&self, t: &Timestamp) -> Result<CampaignState> {
        let origin = Timestamp::from_scalar(t.calendar().clone(), i64::MIN, t.precision());
        let mut replay = Replay::new(origin);
        self.advance(&mut replay, t)?;
        Ok(replay.state)
    }

    fn apply_bucket(&self, replay: &mut Replay, ids: &[EventId]) -> Result<()> {
        let snapshot = replay.state.snapshot_party();
        let mut applied = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.apply_event(replay, id) {
                Ok(()) => applied.push(id),
                Err(err) => {
                    warn!(event = %id, error = %err, "rolling back bucket");
                    replay.state.restore_party(snapshot);
                    for id in applied {
                        replay.undo.remove(&id);
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn apply_event(&self, replay: &mut Replay, id: EventId) -> Result<()> {
        if replay.undo.contains_key(&id) {
            return Err(DecampError::InconsistentRevert(format!("{} is already applied", id)));
        }
        let undo = self.store.apply(id, &mut replay.state, self.include_virtual)?;
        replay.undo.insert(id, undo);
        Ok(())
    }

    fn revert_bucket(&self, replay: &mut Replay, ids: &[EventId]) -> Result<()> {
        let snapshot = replay.state.snapshot_party();
        let mut taken: Vec<(EventId, EventUndo)> = Vec::with_capacity(ids.len());
        for &id in ids.iter().rev() {
            let outcome = match replay.undo.remove(&id) {
                Some(undo) => {
                    taken.push((id, undo.clone()));
                    self.store.revert(id, &mut replay.state, undo)
                }
                None => Err(DecampError::InconsistentRevert(format!("{} was never applied", id))),
            };
            if let Err(err) = outcome {
                warn!(event = %id, error = %err, "rolling back bucket");
                replay.state.restore_party(snapshot);
                replay.undo.extend(taken);
                return Err(err);
            }
        }
        Ok(())
    }
}
