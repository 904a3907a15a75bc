use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::PatternMode;
use crate::error::{ConsoleError, Result};
use crate::models::{RecordId, SearchableRecord};

const HIGHLIGHT_OPEN: &str = "<hl>";
const HIGHLIGHT_CLOSE: &str = "</hl>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LabelFragment {
    Plain(String),
    Highlight(String),
}

/// One row of a suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub record_id: RecordId,
    /// Unhighlighted value of the searched field.
    pub label: String,
    /// Record name, shown as the row tooltip.
    pub title: String,
    pub fragments: Vec<LabelFragment>,
}

impl Suggestion {
    /// Label with highlighted parts wrapped in `<hl>` markers.
    #[must_use]
    pub fn render_marked(&self) -> String {
        self.fragments
            .iter()
            .map(|fragment| match fragment {
                LabelFragment::Plain(text) => text.clone(),
                LabelFragment::Highlight(text) => format!("{HIGHLIGHT_OPEN}{text}{HIGHLIGHT_CLOSE}"),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    mode: PatternMode,
}

impl Matcher {
    #[must_use]
    pub const fn new(mode: PatternMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Compiles `query` case-insensitively. An empty query compiles to `None`
    /// and matches everything.
    pub fn compile(&self, query: &str) -> Result<Option<Regex>> {
        if query.is_empty() {
            return Ok(None);
        }
        let pattern = match self.mode {
            PatternMode::Raw => query.to_string(),
            PatternMode::Literal => regex::escape(query),
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|err| ConsoleError::InvalidPattern(format!("{query}: {err}")))
    }

    /// Enabled records whose `field` matches `query`, in index order.
    ///
    /// Disabled records are left out entirely, as are records without the
    /// field.
    pub fn filter(
        &self,
        query: &str,
        records: &[SearchableRecord],
        field: &str,
    ) -> Result<Vec<Suggestion>> {
        let regex = self.compile(query)?;
        let suggestions = records
            .iter()
            .filter(|record| record.is_enabled())
            .filter_map(|record| {
                let label = record.field(field)?;
                let fragments = match &regex {
                    None => vec![LabelFragment::Plain(label.to_string())],
                    Some(regex) if regex.is_match(label) => highlight(label, regex),
                    Some(_) => return None,
                };
                Some(Suggestion {
                    record_id: record.id.clone(),
                    label: label.to_string(),
                    title: record.name.clone(),
                    fragments,
                })
            })
            .collect();
        Ok(suggestions)
    }
}

fn highlight(label: &str, regex: &Regex) -> Vec<LabelFragment> {
    let mut fragments = Vec::new();
    let mut cursor = 0;
    for found in regex.find_iter(label).filter(|found| !found.is_empty()) {
        if found.start() > cursor {
            fragments.push(LabelFragment::Plain(label[cursor..found.start()].to_string()));
        }
        fragments.push(LabelFragment::Highlight(found.as_str().to_string()));
        cursor = found.end();
    }
    if cursor < label.len() {
        fragments.push(LabelFragment::Plain(label[cursor..].to_string()));
    }
    fragments
}
