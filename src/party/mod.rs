//! Party members and their attributes.
//!
//! Attributes are loosely typed: a boolean, integer, float or string
//! value per key. A `false` boolean is never stored; it reads back as an
//! absent attribute.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecampError, Result};

// =============================================================================
// ATTRIBUTES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Bool,
    Int,
    Float,
    Str,
}

impl AttributeKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "bool",
            AttributeKind::Int => "int",
            AttributeKind::Float => "float",
            AttributeKind::Str => "string",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Bool(_) => AttributeKind::Bool,
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::Str(_) => AttributeKind::Str,
        }
    }

    /// Add `offset` to this value, or take it back off when `inverse`.
    ///
    /// Taking a string offset back off requires the value to still end
    /// with it; anything else means reverts ran out of order.
    pub fn adjust(&mut self, key: &str, offset: &AttributeValue, inverse: bool) -> Result<()> {
        match (&mut *self, offset) {
            (AttributeValue::Bool(_), _) | (_, AttributeValue::Bool(_)) => {
                Err(DecampError::BooleanAttributeNotAdjustable(key.to_string()))
            }
            (AttributeValue::Int(value), AttributeValue::Int(by)) => {
                let adjusted = if inverse { value.checked_sub(*by) } else { value.checked_add(*by) };
                *value = adjusted.ok_or_else(|| DecampError::AttributeOverflow(key.to_string()))?;
                Ok(())
            }
            (AttributeValue::Float(value), AttributeValue::Float(by)) => {
                *value = if inverse { *value - by } else { *value + by };
                Ok(())
            }
            (AttributeValue::Str(value), AttributeValue::Str(tail)) => {
                if !inverse {
                    value.push_str(tail);
                    return Ok(());
                }
                match value.strip_suffix(tail.as_str()).map(str::to_string) {
                    Some(head) => {
                        *value = head;
                        Ok(())
                    }
                    None => Err(DecampError::InconsistentRevert(format!(
                        "cannot trim '{}' from attribute {}: its tail is not '{}'",
                        value, key, tail
                    ))),
                }
            }
            (current, offset) => Err(DecampError::AttributeTypeMismatch {
                key: key.to_string(),
                expected: current.kind().name(),
                found: offset.kind().name(),
            }),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Float(x) => write!(f, "{}", x),
            AttributeValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

// =============================================================================
// CHARACTER
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

impl Character {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            player: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn played_by(mut self, player: &str) -> Self {
        self.player = Some(player.to_string());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: AttributeValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(|k| k.as_str())
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Stored value, `None` when absent (or a `false` boolean).
    pub fn get_raw(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Install a stored value as-is; `None` clears the key.
    pub fn set_raw(&mut self, key: &str, value: Option<AttributeValue>) {
        match value {
            Some(value) => {
                self.attributes.insert(key.to_string(), value);
            }
            None => self.clear(key),
        }
    }

    pub fn set(&mut self, key: &str, value: AttributeValue) {
        let value = match value {
            AttributeValue::Bool(false) => None,
            other => Some(other),
        };
        self.set_raw(key, value);
    }

    pub fn clear(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    /// Adjust an attribute in place. Returns whether anything changed:
    /// an absent attribute is left alone.
    pub fn adjust(&mut self, key: &str, offset: &AttributeValue, inverse: bool) -> Result<bool> {
        if offset.kind() == AttributeKind::Bool {
            return Err(DecampError::BooleanAttributeNotAdjustable(key.to_string()));
        }
        match self.attributes.get_mut(key) {
            Some(value) => value.adjust(key, offset, inverse).map(|_| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_round_trip() {
        let mut c = Character::new("Aria").with_attribute("HP", AttributeValue::Int(10));
        assert!(c.adjust("HP", &AttributeValue::Int(5), false).unwrap());
        assert_eq!(c.get_raw("HP"), Some(&AttributeValue::Int(15)));
        c.adjust("HP", &AttributeValue::Int(5), true).unwrap();
        assert_eq!(c.get_raw("HP"), Some(&AttributeValue::Int(10)));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let mut c = Character::new("Aria").with_attribute("XP", AttributeValue::Int(i64::MAX));
        assert!(matches!(
            c.adjust("XP", &AttributeValue::Int(1), false),
            Err(DecampError::AttributeOverflow(_))
        ));
        assert_eq!(c.get_raw("XP"), Some(&AttributeValue::Int(i64::MAX)));
        c.set("XP", AttributeValue::Int(i64::MIN));
        assert!(c.adjust("XP", &AttributeValue::Int(1), true).is_err());
    }

    #[test]
    fn test_string_suffix_check() {
        let mut c = Character::new("Aria").with_attribute("Notes", AttributeValue::Str("abc".into()));
        let tail = AttributeValue::Str("def".into());
        c.adjust("Notes", &tail, false).unwrap();
        assert_eq!(c.get_raw("Notes"), Some(&AttributeValue::Str("abcdef".into())));
        c.adjust("Notes", &tail, true).unwrap();
        assert_eq!(c.get_raw("Notes"), Some(&AttributeValue::Str("abc".into())));
        let err = c.adjust("Notes", &tail, true).unwrap_err();
        assert!(matches!(err, DecampError::InconsistentRevert(_)));
        assert_eq!(c.get_raw("Notes"), Some(&AttributeValue::Str("abc".into())));
    }

    #[test]
    fn test_false_is_absent() {
        let mut c = Character::new("Aria").with_attribute("Flying", AttributeValue::Bool(true));
        assert_eq!(c.get_raw("Flying"), Some(&AttributeValue::Bool(true)));
        c.set("Flying", AttributeValue::Bool(false));
        assert_eq!(c.get_raw("Flying"), None);
        assert_eq!(c.attribute_keys().count(), 0);
    }

    #[test]
    fn test_booleans_not_adjustable() {
        let mut c = Character::new("Aria").with_attribute("Flying", AttributeValue::Bool(true));
        assert!(matches!(
            c.adjust("Flying", &AttributeValue::Int(1), false),
            Err(DecampError::BooleanAttributeNotAdjustable(_))
        ));
        assert!(matches!(
            c.adjust("Missing", &AttributeValue::Bool(true), false),
            Err(DecampError::BooleanAttributeNotAdjustable(_))
        ));
    }

    #[test]
    fn test_absent_and_mismatched() {
        let mut c = Character::new("Aria").with_attribute("HP", AttributeValue::Int(10));
        assert!(!c.adjust("XP", &AttributeValue::Int(100), false).unwrap());
        assert_eq!(c.get_raw("XP"), None);
        assert!(matches!(
            c.adjust("HP", &AttributeValue::Float(1.5), false),
            Err(DecampError::AttributeTypeMismatch { expected: "int", found: "float", .. })
        ));
    }

    #[test]
    fn test_untagged_json() {
        let c: Character = serde_json::from_str(
            r#"{"name": "Borin", "player": "sam", "attributes": {"HP": 12, "Speed": 1.5, "Notes": "dwarf", "Dead": true}}"#,
        )
        .unwrap();
        assert_eq!(c.get_raw("HP"), Some(&AttributeValue::Int(12)));
        assert_eq!(c.get_raw("Speed"), Some(&AttributeValue::Float(1.5)));
        assert_eq!(c.get_raw("Notes"), Some(&AttributeValue::Str("dwarf".into())));
        assert_eq!(c.get_raw("Dead"), Some(&AttributeValue::Bool(true)));
    }
}
