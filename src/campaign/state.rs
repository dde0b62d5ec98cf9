//! Materialized campaign state.

use std::collections::BTreeMap;

use crate::error::{DecampError, Result};
use crate::party::Character;
use crate::time::Timestamp;

/// Party roster as of `timestamp`.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignState {
    pub timestamp: Timestamp,
    party: BTreeMap<String, Character>,
}

impl CampaignState {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            party: BTreeMap::new(),
        }
    }

    pub fn party(&self) -> &BTreeMap<String, Character> {
        &self.party
    }

    /// Insert under the character's name, or "Name (2)", "Name (3)", ...
    /// on collision. Returns the key used.
    pub fn add_character(&mut self, character: Character) -> String {
        let mut key = character.name.clone();
        let mut n = 2;
        while self.party.contains_key(&key) {
            key = format!("{} ({})", character.name, n);
            n += 1;
        }
        self.party.insert(key.clone(), character);
        key
    }

    /// Insert under exactly `key`.
    pub fn insert_character(&mut self, key: &str, character: Character) -> Result<()> {
        if self.party.contains_key(key) {
            return Err(DecampError::InconsistentRevert(format!(
                "cannot restore {}: the key is taken",
                key
            )));
        }
        self.party.insert(key.to_string(), character);
        Ok(())
    }

    pub fn remove_character(&mut self, key: &str) -> Result<Character> {
        self.party
            .remove(key)
            .ok_or_else(|| DecampError::KeyNotFound(key.to_string()))
    }

    pub fn get_character(&self, key: &str) -> Result<&Character> {
        self.party
            .get(key)
            .ok_or_else(|| DecampError::KeyNotFound(key.to_string()))
    }

    pub fn character_mut(&mut self, key: &str) -> Result<&mut Character> {
        self.party
            .get_mut(key)
            .ok_or_else(|| DecampError::KeyNotFound(key.to_string()))
    }

    pub(crate) fn snapshot_party(&self) -> BTreeMap<String, Character> {
        self.party.clone()
    }

    pub(crate) fn restore_party(&mut self, party: BTreeMap<String, Character>) {
        self.party = party;
    }
}
