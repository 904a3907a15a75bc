use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Classes assigned to a group, with their parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub classes: Vec<ClassAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAssignment {
    pub puppet_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ParameterAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAssignment {
    pub parameter: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub raw_value: String,
}

impl ParameterAssignment {
    /// Text shown in a parameter row. Structured values are pretty printed.
    #[must_use]
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Null => self.raw_value.clone(),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "ANY")]
    Any,
}

impl MatchType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ANY" => Ok(Self::Any),
            other => Err(ConsoleError::Validation(format!(
                "invalid match type: {other} (expected ALL|ANY)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "~")]
    Match,
    #[serde(rename = "!~")]
    NotMatch,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl RuleOperator {
    pub const ALL: [Self; 8] = [
        Self::Equals,
        Self::NotEqual,
        Self::Match,
        Self::NotMatch,
        Self::GreaterThan,
        Self::GreaterOrEqual,
        Self::LessThan,
        Self::LessOrEqual,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEqual => "!=",
            Self::Match => "~",
            Self::NotMatch => "!~",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|operator| operator.as_str() == trimmed)
            .ok_or_else(|| ConsoleError::Validation(format!("unknown rule operator: {trimmed}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRule {
    pub fact: String,
    pub operator: RuleOperator,
    pub value: String,
}

/// Classification rules and pinned nodes of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesDocument {
    #[serde(default)]
    pub match_type: MatchType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facts: Vec<FactRule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariablesDocument {
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl VariablesDocument {
    /// Entries as displayed in the variables table.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .flatten()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub id: String,
    pub name: String,
    pub master_zone: String,
}

/// Classifier answer for one node, as served in YAML by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeClassification {
    #[serde(default)]
    pub classes: Option<BTreeMap<String, Option<BTreeMap<String, serde_json::Value>>>>,
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub environment: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
