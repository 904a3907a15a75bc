use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    #[default]
    Enabled,
    Disabled,
}

impl ActivationState {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// One selectable entry of a dataset.
///
/// `name` is the default display field; other scalar fields sent by the
/// backend (`certname`, `environment`, ...) are kept in `fields` so an input
/// can search on a different one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub state: ActivationState,
}

impl SearchableRecord {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: BTreeMap::new(),
            state: ActivationState::Enabled,
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(self.id.as_str()),
            "name" => Some(self.name.as_str()),
            other => self.fields.get(other).map(String::as_str),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Builds a record from a backend object such as `{id, name}` or
    /// `{id, certname, master_zone}`.
    ///
    /// `label_field` names the field used for `name` when the object has no
    /// `name` of its own.
    pub fn from_json(value: &serde_json::Value, label_field: &str) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ConsoleError::Validation("dataset entry is not an object".to_string()))?;

        let mut fields = BTreeMap::new();
        for (key, raw) in object {
            let text = match raw {
                serde_json::Value::String(text) => text.clone(),
                serde_json::Value::Number(number) => number.to_string(),
                serde_json::Value::Bool(flag) => flag.to_string(),
                _ => continue,
            };
            fields.insert(key.clone(), text);
        }

        let id = fields
            .remove("id")
            .ok_or_else(|| ConsoleError::Validation("dataset entry has no id".to_string()))?;
        let name = match fields.remove("name") {
            Some(name) => name,
            None => fields.get(label_field).cloned().ok_or_else(|| {
                ConsoleError::Validation(format!("dataset entry {id} has no {label_field}"))
            })?,
        };

        Ok(Self {
            id: RecordId::new(id),
            name,
            fields,
            state: ActivationState::Enabled,
        })
    }
}
