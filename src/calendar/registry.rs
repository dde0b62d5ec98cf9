//! Name-keyed calendar factories.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{DecampError, Result};
use crate::time::Timestamp;
use super::{presets, Calendar};

pub type CalendarFactory = fn() -> Result<Arc<dyn Calendar>>;

/// Explicit registry value handed to campaigns; nothing is global.
#[derive(Clone, Debug)]
pub struct CalendarRegistry {
    factories: BTreeMap<String, CalendarFactory>,
}

impl CalendarRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { factories: BTreeMap::new() }
    }

    /// Registry with the bundled calendars.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Campaign", || Ok(Arc::new(presets::campaign())));
        registry.register("Greyhawk", || Ok(Arc::new(presets::greyhawk()?)));
        registry.register("Eberron", || Ok(Arc::new(presets::eberron()?)));
        registry.register("Forgotten Realms", || Ok(Arc::new(presets::forgotten_realms()?)));
        registry.register("Gregorian", || Ok(Arc::new(presets::gregorian()?)));
        registry
    }

    pub fn register(&mut self, name: &str, factory: CalendarFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Calendar>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DecampError::UnknownCalendar(name.to_string()))?;
        factory()
    }

    pub fn default_timestamp(&self, name: &str) -> Result<Timestamp> {
        Timestamp::default_for(self.get(name)?)
    }
}

impl Default for CalendarRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_names() {
        let registry = CalendarRegistry::default();
        assert_eq!(
            registry.names(),
            vec!["Campaign", "Eberron", "Forgotten Realms", "Greyhawk", "Gregorian"]
        );
    }

    #[test]
    fn test_unknown_calendar() {
        let registry = CalendarRegistry::default();
        assert!(matches!(registry.get("Harptos"), Err(DecampError::UnknownCalendar(name)) if name == "Harptos"));
        assert!(CalendarRegistry::new().get("Gregorian").is_err());
    }

    #[test]
    fn test_default_timestamps() {
        let registry = CalendarRegistry::default();
        let ts = registry.default_timestamp("Greyhawk").unwrap();
        assert_eq!(ts.to_string(), "1 Needfest, 591 CY Noon");
        let ts = registry.default_timestamp("Forgotten Realms").unwrap();
        assert_eq!(ts.to_string(), "Hammer 1, 1491 DR Noon");
        let ts = registry.default_timestamp("Campaign").unwrap();
        assert_eq!(ts.to_string(), "Day 1 Noon");
    }
}
