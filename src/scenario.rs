//! JSON replay scenarios: a campaign config plus scheduled events.
//!
//! ```json
//! {
//!   "config": { "calendar": "Greyhawk" },
//!   "events": [
//!     { "at": { "year": 591, "month": 2, "day": 3, "hour": 9 },
//!       "title": "Aria arrives",
//!       "results": [ { "action": "character_add", "character": { "name": "Aria" } } ] }
//!   ],
//!   "until": { "year": 591, "month": 3 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::{Calendar, CalendarRegistry, DateParts, Interval};
use crate::campaign::Campaign;
use crate::config::CampaignConfig;
use crate::error::Result;
use crate::events::{EventResult, ResultAction};
use crate::ruleset::RulesetRegistry;
use crate::time::Timestamp;

fn first() -> u32 {
    1
}

fn first_day() -> i64 {
    1
}

fn hour_precision() -> Interval {
    Interval::Hour
}

fn generic() -> String {
    "Generic".to_string()
}

/// A date as written in a scenario; omitted parts default to the start
/// of the year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct When {
    pub year: i64,
    #[serde(default = "first")]
    pub month: u32,
    #[serde(default = "first_day")]
    pub day: i64,
    #[serde(default)]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
    #[serde(default = "hour_precision")]
    pub precision: Interval,
}

impl When {
    pub fn timestamp(&self, calendar: Arc<dyn Calendar>) -> Result<Timestamp> {
        let parts = DateParts::new(self.year, self.month, self.day)
            .at(self.hour, self.minute, self.second)
            .with_week_length(calendar.week_length());
        Timestamp::new(calendar, &parts, self.precision)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub at: When,
    #[serde(default = "generic")]
    pub event_type: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    pub results: Vec<ResultAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: CampaignConfig,
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
    #[serde(default)]
    pub until: Option<When>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Build the campaign, schedule every event in file order, then move
    /// to `until` if given.
    pub fn run(&self, calendars: &CalendarRegistry, rulesets: &RulesetRegistry) -> Result<Campaign> {
        let mut campaign = Campaign::from_config(&self.config, calendars, rulesets)?;
        for scheduled in &self.events {
            let creator = scheduled.creator.clone().unwrap_or_else(|| campaign.gm().to_string());
            let mut event = campaign.new_event(&scheduled.event_type, &creator)?.with_title(&scheduled.title);
            event.is_virtual = scheduled.is_virtual;
            for action in &scheduled.results {
                event.add_result(EventResult::from_action(&creator, action.clone()));
            }
            let at = scheduled.at.timestamp(campaign.calendar().clone())?;
            campaign.add_event(&at, event)?;
        }
        if let Some(until) = &self.until {
            let t = until.timestamp(campaign.calendar().clone())?;
            campaign.set_timestamp(t)?;
        }
        info!(campaign = %campaign.name, events = self.events.len(), "scenario replayed");
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::AttributeValue;

    const SCENARIO: &str = r#"{
        "config": { "name": "Hommlet", "calendar": "Greyhawk" },
        "events": [
            { "at": { "year": 591, "month": 2, "day": 3, "hour": 9 },
              "title": "Aria arrives",
              "results": [ { "action": "character_add",
                             "character": { "name": "Aria", "attributes": { "HP": 10 } } } ] },
            { "at": { "year": 591, "month": 2, "day": 5 },
              "results": [ { "action": "character_edit", "key": "Aria",
                             "mods": [ { "kind": "adjustment", "key": "HP", "offset": -3 } ] } ] },
            { "at": { "year": 591, "month": 2, "day": 4 }, "virtual": true,
              "results": [ { "action": "character_remove", "key": "Aria" } ] }
        ],
        "until": { "year": 591, "month": 3 }
    }"#;

    #[test]
    fn test_run_scenario() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        let campaign = scenario
            .run(&CalendarRegistry::default(), &RulesetRegistry::default())
            .unwrap();
        assert_eq!(campaign.name, "Hommlet");
        assert_eq!(campaign.get_timestamp().to_string(), "Starday, 1 Readying, 591 CY 00");
        let aria = campaign.get_character("Aria").unwrap();
        assert_eq!(aria.get_raw("HP"), Some(&AttributeValue::Int(7)));
    }

    #[test]
    fn test_when_defaults() {
        let when: When = serde_json::from_str(r#"{ "year": 1491 }"#).unwrap();
        assert_eq!((when.month, when.day, when.hour, when.precision), (1, 1, 0, Interval::Hour));
    }
}
