use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Message shown when the backend fails without usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "A problem ocurred, try again later!";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("commit action is disabled")]
    CommitLocked,

    #[error("backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ConsoleError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern(_) => "INVALID_PATTERN",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::CommitLocked => "COMMIT_LOCKED",
            Self::Rejected { .. } => "REJECTED",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Toml(_) => "TOML_ERROR",
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    /// Text for a page banner: the backend's flattened validation messages
    /// when it sent any, the generic failure message otherwise.
    pub fn banner_text(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            status: match self {
                Self::Rejected { status, .. } => Some(*status),
                _ => None,
            },
        }
    }
}

/// Flattens a backend validation body into one banner line per field.
///
/// Fields are taken in key order; list items are joined with `","` and
/// entries with a newline. Anything that is not a non-empty object yields an
/// empty string so callers fall back to the generic message.
pub fn flatten_validation_messages(body: &serde_json::Value) -> String {
    let Some(fields) = body.as_object() else {
        return String::new();
    };
    fields
        .values()
        .map(|value| match value {
            serde_json::Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Vec<_>>()
                .join(","),
            other => scalar_text(other),
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_field_message_is_used_verbatim() {
        assert_eq!(
            flatten_validation_messages(&json!({"field": ["error"]})),
            "error"
        );
    }

    #[test]
    fn multiple_fields_are_joined_per_line() {
        let body = json!({
            "facts": ["unknown fact", "bad operator"],
            "nodes": "node missing",
        });
        assert_eq!(
            flatten_validation_messages(&body),
            "unknown fact,bad operator\nnode missing"
        );
    }

    #[test]
    fn non_object_body_flattens_to_empty() {
        assert_eq!(flatten_validation_messages(&json!(["x"])), "");
        assert_eq!(flatten_validation_messages(&json!(null)), "");
    }

    #[test]
    fn banner_text_falls_back_to_generic_message() {
        let rejected = ConsoleError::Rejected {
            status: 500,
            message: String::new(),
        };
        assert_eq!(rejected.banner_text(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(ConsoleError::CommitLocked.banner_text(), GENERIC_FAILURE_MESSAGE);

        let validation = ConsoleError::Rejected {
            status: 400,
            message: "error".to_string(),
        };
        assert_eq!(validation.banner_text(), "error");
        assert_eq!(validation.to_payload("rules.commit").status, Some(400));
    }
}
