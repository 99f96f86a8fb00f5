//! Free-form contact properties.
//!
//! Any field of a subscribe request that the service does not know about is
//! forwarded verbatim to the directory as a contact property. Values are
//! restricted to scalars because that is all the directory's property bag
//! can hold.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Directory property key for the contact's preferred language (ISO 639).
pub const LANGUAGE_PROPERTY: &str = "language";

/// Directory property key for the page that initiated the subscription.
pub const REFERER_PROPERTY: &str = "referer";

/// Keys callers may never set through the extension map.
const RESERVED_KEYS: &[&str] = &[
    "email",
    "subscribed",
    "optInStatus",
    super::opt_in::CUSTOM_OPT_IN_STATUS_PROPERTY,
    "mailingLists",
];

/// A scalar contact property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Null,
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Converts a JSON value, dropping anything that is not a scalar.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(PropertyValue::Null),
            serde_json::Value::Bool(value) => Some(PropertyValue::Bool(value)),
            serde_json::Value::Number(value) => Some(PropertyValue::Number(value)),
            serde_json::Value::String(value) => Some(PropertyValue::String(value)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Ordered map of contact properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactProperties(BTreeMap<String, PropertyValue>);

impl ContactProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    /// Returns a copy without the keys owned by the subscription state machine.
    pub fn without_reserved(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyValue)> for ContactProperties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ContactProperties {
    type Item = (String, PropertyValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
