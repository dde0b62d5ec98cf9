//! Campaign configuration.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Settings needed to open a campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Display name of the campaign.
    pub name: String,

    /// Player key of the game master (sees and edits everything).
    pub gm: String,

    /// Calendar registry name (default: "Campaign").
    pub calendar: String,

    /// Ruleset registry name (default: "Generic").
    pub ruleset: String,

    /// Replay plans and hypotheticals as if they happened.
    pub include_virtual_events: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Campaign".to_string(),
            gm: "gm".to_string(),
            calendar: "Campaign".to_string(),
            ruleset: "Generic".to_string(),
            include_virtual_events: false,
        }
    }
}

impl CampaignConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CampaignConfig::default();
        assert_eq!(config.calendar, "Campaign");
        assert_eq!(config.ruleset, "Generic");
        assert!(!config.include_virtual_events);
    }

    #[test]
    fn test_partial_json() {
        let config: CampaignConfig =
            serde_json::from_str(r#"{"name": "Temple of Elemental Evil", "calendar": "Greyhawk"}"#).unwrap();
        assert_eq!(config.name, "Temple of Elemental Evil");
        assert_eq!(config.calendar, "Greyhawk");
        assert_eq!(config.gm, "gm");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(CampaignConfig::load("/nonexistent/decamp.json").is_err());
    }
}
