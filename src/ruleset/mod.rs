//! Game rulesets: which event types exist and how they are built.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DecampError, Result};
use crate::events::Event;
use crate::party::Character;

/// Builds a fresh event of one type for `creator`.
pub type EventFactory = fn(creator: &str) -> Event;

#[derive(Clone)]
pub struct Ruleset {
    name: String,
    factories: BTreeMap<String, EventFactory>,
}

impl Ruleset {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            factories: BTreeMap::new(),
        }
    }

    /// System-neutral rules with only the "Generic" event type.
    pub fn generic() -> Self {
        let mut ruleset = Self::new("Generic");
        ruleset.register("Generic", |creator| Event::new("Generic", creator));
        ruleset
    }

    pub fn dnd35() -> Self {
        let mut ruleset = Self::generic();
        ruleset.name = "D&D 3.5".to_string();
        ruleset.register("Combat", |creator| Event::new("Combat", creator).with_title("Combat"));
        ruleset
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, event_type: &str, factory: EventFactory) {
        self.factories.insert(event_type.to_string(), factory);
    }

    /// Event type tags, sorted.
    pub fn event_types(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }

    pub fn new_event(&self, event_type: &str, creator: &str) -> Result<Event> {
        let factory = self
            .factories
            .get(event_type)
            .ok_or_else(|| DecampError::UnknownEventType(event_type.to_string()))?;
        Ok(factory(creator))
    }

    pub fn new_character(&self, name: &str) -> Character {
        Character::new(name)
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("name", &self.name)
            .field("event_types", &self.event_types())
            .finish()
    }
}

/// Name-keyed ruleset constructors.
#[derive(Clone, Debug)]
pub struct RulesetRegistry {
    rulesets: BTreeMap<String, fn() -> Ruleset>,
}

impl RulesetRegistry {
    pub fn new() -> Self {
        Self { rulesets: BTreeMap::new() }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Generic", Ruleset::generic);
        registry.register("D&D 3.5", Ruleset::dnd35);
        registry
    }

    pub fn register(&mut self, name: &str, build: fn() -> Ruleset) {
        self.rulesets.insert(name.to_string(), build);
    }

    pub fn names(&self) -> Vec<&str> {
        self.rulesets.keys().map(|k| k.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<Ruleset> {
        self.rulesets
            .get(name)
            .map(|build| build())
            .ok_or_else(|| DecampError::UnknownRuleset(name.to_string()))
    }
}

impl Default for RulesetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        assert_eq!(Ruleset::generic().event_types(), vec!["Generic"]);
        assert_eq!(Ruleset::dnd35().event_types(), vec!["Combat", "Generic"]);
    }

    #[test]
    fn test_new_event() {
        let rules = Ruleset::dnd35();
        let event = rules.new_event("Combat", "alice").unwrap();
        assert_eq!(event.event_type, "Combat");
        assert_eq!(event.owner.as_deref(), Some("alice"));
        assert!(matches!(
            Ruleset::generic().new_event("Combat", "alice"),
            Err(DecampError::UnknownEventType(tag)) if tag == "Combat"
        ));
    }

    #[test]
    fn test_registry() {
        let registry = RulesetRegistry::default();
        assert_eq!(registry.names(), vec!["D&D 3.5", "Generic"]);
        assert_eq!(registry.get("D&D 3.5").unwrap().name(), "D&D 3.5");
        assert!(matches!(registry.get("Pathfinder"), Err(DecampError::UnknownRuleset(_))));
    }
}
