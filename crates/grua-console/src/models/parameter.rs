use serde::{Deserialize, Serialize};

/// Parameter definition of a puppet class, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub values: serde_json::Value,
}

impl ParameterSpec {
    #[must_use]
    pub fn kind(&self) -> ParameterType {
        ParameterType::parse(&self.value_type)
    }

    /// Allowed values: a list for enums and booleans, otherwise the comma
    /// separated string the backend stores.
    #[must_use]
    pub fn allowed_values(&self) -> Vec<String> {
        match &self.values {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
            serde_json::Value::String(text) if !text.is_empty() => {
                text.split(',').map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Default value to prefill; `""` and `"0"` count as no default.
    #[must_use]
    pub fn prefill(&self) -> String {
        match self.default.as_deref() {
            None | Some("" | "0") => String::new(),
            Some(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    Hash,
    Array,
    Boolean,
    Enum,
    Integer,
    Float,
    Other,
}

impl ParameterType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HASH" => Self::Hash,
            "ARRAY" => Self::Array,
            "BOOLEAN" => Self::Boolean,
            "ENUM" => Self::Enum,
            "INTEGER" => Self::Integer,
            "FLOAT" => Self::Float,
            _ => Self::Other,
        }
    }
}
