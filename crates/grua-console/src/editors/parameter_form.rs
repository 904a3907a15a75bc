use serde::Serialize;

use crate::error::{ConsoleError, Result};
use crate::models::{ParameterSpec, ParameterType};

/// Input rendered for the selected parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    TextArea,
    Select,
    Number,
    FloatText,
    Text,
}

impl WidgetKind {
    #[must_use]
    pub const fn for_type(kind: ParameterType) -> Self {
        match kind {
            ParameterType::Hash | ParameterType::Array => Self::TextArea,
            ParameterType::Boolean | ParameterType::Enum => Self::Select,
            ParameterType::Integer => Self::Number,
            ParameterType::Float => Self::FloatText,
            ParameterType::Other => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterWidget {
    pub kind: WidgetKind,
    /// Backend type name, shown as placeholder and type badge.
    pub type_label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterOption {
    pub spec: ParameterSpec,
    pub disabled: bool,
}

/// Strips what the widget does not accept: integers keep digits, floats
/// keep digits and the first dot.
#[must_use]
pub fn sanitize_value(kind: WidgetKind, raw: &str) -> String {
    match kind {
        WidgetKind::Number => raw.chars().filter(char::is_ascii_digit).collect(),
        WidgetKind::FloatText => {
            let mut seen_dot = false;
            raw.chars()
                .filter(|ch| match ch {
                    '0'..='9' => true,
                    '.' if !seen_dot => {
                        seen_dot = true;
                        true
                    }
                    _ => false,
                })
                .collect()
        }
        WidgetKind::TextArea | WidgetKind::Select | WidgetKind::Text => raw.to_string(),
    }
}

/// Parameter picker and value input of one class block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterForm {
    options: Vec<ParameterOption>,
    selected: Option<String>,
    widget: Option<ParameterWidget>,
    value: String,
}

impl ParameterForm {
    /// Options for `specs`; names in `used` start disabled.
    pub fn new(specs: Vec<ParameterSpec>, used: &[String]) -> Self {
        let options = specs
            .into_iter()
            .map(|spec| ParameterOption {
                disabled: used.contains(&spec.name),
                spec,
            })
            .collect();
        Self {
            options,
            ..Self::default()
        }
    }

    /// Selects a parameter by name and renders its widget; an empty name
    /// clears the input.
    pub fn select(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            self.selected = None;
            self.widget = None;
            self.value.clear();
            return Ok(());
        }
        let option = self
            .options
            .iter()
            .find(|option| option.spec.name == name)
            .ok_or_else(|| ConsoleError::NotFound(format!("parameter {name}")))?;
        if option.disabled {
            return Err(ConsoleError::Validation(format!(
                "parameter {name} is already set"
            )));
        }

        let kind = WidgetKind::for_type(option.spec.kind());
        let prefill = option.spec.prefill();
        let choices = match kind {
            WidgetKind::Select => option.spec.allowed_values(),
            _ => Vec::new(),
        };
        // A select shows its default when listed, otherwise its first entry.
        let value = match kind {
            WidgetKind::Select if !choices.contains(&prefill) => {
                choices.first().cloned().unwrap_or_default()
            }
            _ => sanitize_value(kind, &prefill),
        };

        self.widget = Some(ParameterWidget {
            kind,
            type_label: option.spec.value_type.clone(),
            choices,
        });
        self.selected = Some(name.to_string());
        self.value = value;
        Ok(())
    }

    /// Stores a keystroke or blur value and returns what the input shows.
    pub fn input(&mut self, raw: &str) -> &str {
        self.value = match &self.widget {
            Some(widget) => sanitize_value(widget.kind, raw),
            None => String::new(),
        };
        &self.value
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        self.selected.is_some() && !self.value.is_empty()
    }

    /// Consumes the current entry: the option is disabled and the input
    /// cleared.
    pub(crate) fn take_entry(&mut self) -> Result<(String, String)> {
        if !self.can_add() {
            return Err(ConsoleError::Validation(
                "select a parameter and enter a value".to_string(),
            ));
        }
        let name = self.selected.take().unwrap_or_default();
        let value = std::mem::take(&mut self.value);
        self.widget = None;
        self.set_disabled(&name, true);
        Ok((name, value))
    }

    pub(crate) fn release(&mut self, name: &str) {
        self.set_disabled(name, false);
    }

    fn set_disabled(&mut self, name: &str, disabled: bool) {
        for option in self.options.iter_mut().filter(|option| option.spec.name == name) {
            option.disabled = disabled;
        }
    }

    #[must_use]
    pub fn options(&self) -> &[ParameterOption] {
        &self.options
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn widget(&self) -> Option<&ParameterWidget> {
        self.widget.as_ref()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spec(name: &str, kind: &str, default: Option<&str>, values: serde_json::Value) -> ParameterSpec {
        ParameterSpec {
            id: None,
            name: name.to_string(),
            value_type: kind.to_string(),
            default: default.map(ToString::to_string),
            values,
        }
    }

    fn form() -> ParameterForm {
        ParameterForm::new(
            vec![
                spec("servers", "ARRAY", None, json!(null)),
                spec("enabled", "Boolean", Some("false"), json!(["true", "false"])),
                spec("mode", "ENUM", None, json!("strict,relaxed")),
                spec("port", "INTEGER", Some("0"), json!(null)),
                spec("ratio", "FLOAT", Some("0.5"), json!(null)),
                spec("motd", "STRING", Some(""), json!(null)),
            ],
            &["motd".to_string()],
        )
    }

    #[test]
    fn widget_follows_parameter_type() {
        let mut form = form();
        let kinds: Vec<_> = ["servers", "enabled", "mode", "port", "ratio"]
            .into_iter()
            .map(|name| {
                form.select(name).expect("select");
                form.widget().expect("widget").kind
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                WidgetKind::TextArea,
                WidgetKind::Select,
                WidgetKind::Select,
                WidgetKind::Number,
                WidgetKind::FloatText,
            ]
        );
    }

    #[test]
    fn select_preselects_default_or_first_choice() {
        let mut form = form();
        form.select("enabled").expect("select");
        assert_eq!(form.value(), "false");
        assert!(form.can_add());

        form.select("mode").expect("select");
        assert_eq!(form.widget().expect("widget").choices, vec!["strict", "relaxed"]);
        assert_eq!(form.value(), "strict");
    }

    #[test]
    fn zero_default_renders_empty_and_blocks_add() {
        let mut form = form();
        form.select("port").expect("select");
        assert_eq!(form.value(), "");
        assert!(!form.can_add());
        assert_eq!(form.input("8a0b"), "80");
        assert!(form.can_add());
    }

    #[test]
    fn float_input_keeps_only_the_first_dot() {
        assert_eq!(sanitize_value(WidgetKind::FloatText, "1.2.3x"), "1.23");
        assert_eq!(sanitize_value(WidgetKind::FloatText, "abc"), "");
        assert_eq!(sanitize_value(WidgetKind::Number, "-12.5"), "125");
        assert_eq!(sanitize_value(WidgetKind::Text, "a \"b\""), "a \"b\"");
    }

    #[test]
    fn used_options_are_disabled_until_released() {
        let mut form = form();
        assert!(form.select("motd").is_err());

        form.select("servers").expect("select");
        form.input("[\"a\"]");
        let (name, value) = form.take_entry().expect("entry");
        assert_eq!((name.as_str(), value.as_str()), ("servers", "[\"a\"]"));
        assert!(form.widget().is_none());
        assert!(form.select("servers").is_err());

        form.release("servers");
        form.select("servers").expect("released");
    }

    #[test]
    fn clearing_the_selection_disables_add() {
        let mut form = form();
        form.select("ratio").expect("select");
        assert!(form.can_add());
        form.select("").expect("clear");
        assert!(!form.can_add());
        assert_eq!(form.input("1.5"), "");
    }
}
