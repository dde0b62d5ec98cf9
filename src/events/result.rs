//! Atomic state mutations and their undo tokens.

use serde::{Deserialize, Serialize};

use crate::campaign::CampaignState;
use crate::error::{DecampError, Result};
use crate::party::{AttributeValue, Character};
use super::EventId;

// =============================================================================
// ATTRIBUTE MODIFICATIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeMod {
    /// Add to (or append to) the current value.
    Adjustment { key: String, offset: AttributeValue },
    /// Overwrite the current value.
    Replacement { key: String, value: AttributeValue },
}

/// What an [`AttributeMod`] did, so it can be taken back.
#[derive(Clone, Debug, PartialEq)]
pub enum ModUndo {
    /// Value before the adjustment; reverting puts it back exactly.
    Adjusted { previous: AttributeValue },
    /// The attribute was absent; nothing changed.
    Untouched,
    Replaced { previous: Option<AttributeValue> },
}

impl AttributeMod {
    pub fn key(&self) -> &str {
        match self {
            AttributeMod::Adjustment { key, .. } | AttributeMod::Replacement { key, .. } => key,
        }
    }

    pub fn apply(&self, character: &mut Character) -> Result<ModUndo> {
        match self {
            AttributeMod::Adjustment { key, offset } => {
                let previous = character.get_raw(key).cloned();
                character.adjust(key, offset, false)?;
                Ok(match previous {
                    Some(previous) => ModUndo::Adjusted { previous },
                    None => ModUndo::Untouched,
                })
            }
            AttributeMod::Replacement { key, value } => {
                let previous = character.get_raw(key).cloned();
                character.set(key, value.clone());
                Ok(ModUndo::Replaced { previous })
            }
        }
    }

    pub fn revert(&self, character: &mut Character, undo: ModUndo) -> Result<()> {
        match (self, undo) {
            (AttributeMod::Adjustment { key, offset }, ModUndo::Adjusted { previous }) => {
                // undoing the offset checks that later changes were reverted first
                if !character.adjust(key, offset, true)? {
                    return Err(DecampError::InconsistentRevert(format!(
                        "attribute {} vanished before its adjustment was reverted",
                        key
                    )));
                }
                character.set_raw(key, Some(previous));
                Ok(())
            }
            (AttributeMod::Adjustment { .. }, ModUndo::Untouched) => Ok(()),
            (AttributeMod::Replacement { key, .. }, ModUndo::Replaced { previous }) => {
                character.set_raw(key, previous);
                Ok(())
            }
            (m, undo) => Err(DecampError::InconsistentRevert(format!(
                "undo {:?} does not belong to modification of {}",
                undo,
                m.key()
            ))),
        }
    }
}

// =============================================================================
// EVENT RESULTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResultAction {
    CharacterAdd { character: Character },
    CharacterRemove { key: String },
    CharacterEdit { key: String, mods: Vec<AttributeMod> },
}

/// Data captured by [`EventResult::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum UndoToken {
    /// Key the added character ended up under.
    Added { key: String },
    Removed { key: String, character: Character },
    /// One entry per modification, in application order.
    Edited { mods: Vec<ModUndo> },
}

/// One atomic change made by an event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventResult {
    pub result_type: String,
    pub creator: String,
    pub summary: String,
    pub(crate) sub_event: Option<EventId>,
    pub action: ResultAction,
}

impl EventResult {
    pub fn new(result_type: &str, creator: &str, summary: &str, action: ResultAction) -> Self {
        Self {
            result_type: result_type.to_string(),
            creator: creator.to_string(),
            summary: summary.to_string(),
            sub_event: None,
            action,
        }
    }

    /// Result of the action's own type with a generated summary.
    pub fn from_action(creator: &str, action: ResultAction) -> Self {
        let (result_type, summary) = match &action {
            ResultAction::CharacterAdd { character } => {
                ("CharacterAdd", format!("{} joins the party", character.name))
            }
            ResultAction::CharacterRemove { key } => ("CharacterRemove", format!("{} leaves the party", key)),
            ResultAction::CharacterEdit { key, mods } => {
                let keys: Vec<&str> = mods.iter().map(|m| m.key()).collect();
                ("CharacterEdit", format!("{} changes {}", key, keys.join(", ")))
            }
        };
        Self::new(result_type, creator, &summary, action)
    }

    pub fn character_add(creator: &str, character: Character) -> Self {
        Self::from_action(creator, ResultAction::CharacterAdd { character })
    }

    pub fn character_remove(creator: &str, key: &str) -> Self {
        Self::from_action(creator, ResultAction::CharacterRemove { key: key.to_string() })
    }

    pub fn character_edit(creator: &str, key: &str, mods: Vec<AttributeMod>) -> Self {
        Self::from_action(creator, ResultAction::CharacterEdit { key: key.to_string(), mods })
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    /// Nested event applied right after this result.
    pub fn sub_event(&self) -> Option<EventId> {
        self.sub_event
    }

    pub fn apply(&self, state: &mut CampaignState) -> Result<UndoToken> {
        match &self.action {
            ResultAction::CharacterAdd { character } => {
                let key = state.add_character(character.clone());
                Ok(UndoToken::Added { key })
            }
            ResultAction::CharacterRemove { key } => {
                let character = state.remove_character(key)?;
                Ok(UndoToken::Removed { key: key.clone(), character })
            }
            ResultAction::CharacterEdit { key, mods } => {
                let character = state.character_mut(key)?;
                let undo = mods
                    .iter()
                    .map(|m| m.apply(character))
                    .collect::<Result<Vec<_>>>()?;
                Ok(UndoToken::Edited { mods: undo })
            }
        }
    }

    pub fn revert(&self, state: &mut CampaignState, token: UndoToken) -> Result<()> {
        match (&self.action, token) {
            (ResultAction::CharacterAdd { .. }, UndoToken::Added { key }) => {
                state.remove_character(&key).map(|_| ())
            }
            (ResultAction::CharacterRemove { .. }, UndoToken::Removed { key, character }) => {
                state.insert_character(&key, character)
            }
            (ResultAction::CharacterEdit { key, mods }, UndoToken::Edited { mods: undo }) => {
                if undo.len() != mods.len() {
                    return Err(DecampError::InconsistentRevert(format!(
                        "edit of {} has {} modifications but {} undo entries",
                        key,
                        mods.len(),
                        undo.len()
                    )));
                }
                let character = state.character_mut(key)?;
                for (m, u) in mods.iter().zip(undo).rev() {
                    m.revert(character, u)?;
                }
                Ok(())
            }
            (_, token) => Err(DecampError::InconsistentRevert(format!(
                "undo {:?} does not belong to result '{}'",
                token, self.summary
            ))),
        }
    }
}
