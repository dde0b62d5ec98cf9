//! A running campaign: the current instant, the timeline of scheduled
//! events, and the party as materialized at that instant.
//!
//! At rest the live state sits exactly at `now` and equals a from-scratch
//! replay of every scheduled event up to `now`.

pub mod state;
pub mod timeline;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::calendar::{Calendar, CalendarRegistry, DateParts, Interval};
use crate::config::CampaignConfig;
use crate::error::Result;
use crate::events::{Event, EventId, ResultRef};
use crate::party::Character;
use crate::ruleset::{Ruleset, RulesetRegistry};
use crate::time::Timestamp;

pub use state::CampaignState;
pub use timeline::{Replay, Timeline};

#[derive(Debug)]
pub struct Campaign {
    pub name: String,
    gm: String,
    calendar: Arc<dyn Calendar>,
    ruleset: Ruleset,
    now: Timestamp,
    timeline: Timeline,
    live: Replay,
}

impl Campaign {
    /// Fresh campaign at the calendar's default instant.
    pub fn new(
        name: &str,
        gm: &str,
        calendar: Arc<dyn Calendar>,
        ruleset: Ruleset,
        include_virtual: bool,
    ) -> Result<Self> {
        let now = Timestamp::default_for(calendar.clone())?;
        info!(campaign = name, calendar = calendar.name(), ruleset = ruleset.name(), start = %now, "created campaign");
        Ok(Self {
            name: name.to_string(),
            gm: gm.to_string(),
            calendar,
            ruleset,
            live: Replay::new(now.clone()),
            now,
            timeline: Timeline::new(include_virtual),
        })
    }

    pub fn from_config(
        config: &CampaignConfig,
        calendars: &CalendarRegistry,
        rulesets: &RulesetRegistry,
    ) -> Result<Self> {
        let calendar = calendars.get(&config.calendar)?;
        let ruleset = rulesets.get(&config.ruleset)?;
        Self::new(&config.name, &config.gm, calendar, ruleset, config.include_virtual_events)
    }

    pub fn gm(&self) -> &str {
        &self.gm
    }

    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    // -- events ---------------------------------------------------------------

    /// Unscheduled event of a ruleset type.
    pub fn new_event(&self, event_type: &str, creator: &str) -> Result<Event> {
        self.ruleset.new_event(event_type, creator)
    }

    pub fn new_character(&self, name: &str) -> Character {
        self.ruleset.new_character(name)
    }

    /// Store an event without scheduling it, e.g. to nest it later.
    pub fn stash_event(&mut self, event: Event) -> Result<EventId> {
        self.timeline.store.insert(event)
    }

    pub fn attach_sub_event(&mut self, owner: ResultRef, sub: EventId) -> Result<()> {
        self.timeline.store.attach_sub_event(owner, sub)
    }

    /// Store and schedule `event` at `t`. An event that could not be
    /// scheduled is not kept.
    pub fn add_event(&mut self, t: &Timestamp, event: Event) -> Result<EventId> {
        let id = self.stash_event(event)?;
        if let Err(err) = self.schedule_event(t, id) {
            self.timeline.store.discard(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Schedule a stashed top-level event at `t` and bring the live state
    /// back to `now` (or to `t` if that is later).
    pub fn schedule_event(&mut self, t: &Timestamp, id: EventId) -> Result<()> {
        // everything after t is undone first so the new event lands behind
        // every earlier event and ahead of every later one
        self.timeline.rewind(&mut self.live, t)?;
        self.timeline.advance(&mut self.live, t)?;
        self.timeline.schedule(t, id)?;
        if let Err(err) = self.timeline.apply_single(&mut self.live, id) {
            self.timeline.unschedule(t, id);
            self.sync()?;
            return Err(err);
        }
        info!(event = %id, at = %t, "scheduled event");
        if self.now < *t {
            self.now = t.clone();
        }
        self.sync()
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.timeline.store.get(id)
    }

    pub fn events_at(&self, t: &Timestamp) -> Vec<&Event> {
        self.timeline.events_at(t)
    }

    pub fn events_between(&self, start: &Timestamp, end: &Timestamp) -> Vec<&Event> {
        self.timeline.events_between(start, end)
    }

    // -- time -----------------------------------------------------------------

    pub fn get_timestamp(&self) -> &Timestamp {
        &self.now
    }

    /// Move `now` forward to `t`; earlier instants are ignored.
    pub fn advance_to(&mut self, t: &Timestamp) -> Result<()> {
        if *t > self.now {
            self.set_timestamp(t.clone())?;
        }
        Ok(())
    }

    /// Move `now` back to `t`; later instants are ignored.
    pub fn rewind_to(&mut self, t: &Timestamp) -> Result<()> {
        if *t < self.now {
            self.set_timestamp(t.clone())?;
        }
        Ok(())
    }

    pub fn set_timestamp(&mut self, t: Timestamp) -> Result<()> {
        info!(from = %self.now, to = %t, "time changed");
        self.now = t;
        self.sync()
    }

    pub fn set_date(&mut self, parts: &DateParts, precision: Interval) -> Result<()> {
        let t = Timestamp::new(self.calendar.clone(), parts, precision)?;
        self.set_timestamp(t)
    }

    pub fn adjust_timestamp(&mut self, amount: i64, unit: Interval) -> Result<()> {
        let t = self.now.add(amount, unit)?;
        self.set_timestamp(t)
    }

    /// Bring the live state to `now`.
    fn sync(&mut self) -> Result<()> {
        if self.live.state.timestamp < self.now {
            self.timeline.advance(&mut self.live, &self.now)
        } else {
            self.timeline.rewind(&mut self.live, &self.now)
        }
    }

    // -- party ----------------------------------------------------------------

    pub fn state(&self) -> &CampaignState {
        &self.live.state
    }

    pub fn get_party(&self) -> &BTreeMap<String, Character> {
        self.live.state.party()
    }

    pub fn get_character(&self, key: &str) -> Result<&Character> {
        self.live.state.get_character(key)
    }

    /// State as of `t`, replayed from scratch; the live state is untouched.
    pub fn materialize_at(&self, t: &Timestamp) -> Result<CampaignState> {
        self.timeline.materialize(t)
    }
}
