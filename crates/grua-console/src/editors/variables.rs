use crate::client::{ConsoleClient, Transport};
use crate::error::{ConsoleError, GENERIC_FAILURE_MESSAGE, Result};
use crate::models::VariablesDocument;
use crate::page::{BannerKind, CommitPolicy, EditableList, PageChrome, PendingRow, RowRef};

use super::VARIABLES_UPDATED;

// A failed save keeps the commit action disabled until the next edit.
const POLICY: CommitPolicy = CommitPolicy {
    rearm_on_failure: false,
};

const FIELD_KEY: &str = "key";
const FIELD_VALUE: &str = "value";

#[derive(Debug)]
pub struct VariablesEditor {
    group: String,
    key: String,
    value: String,
    rows: EditableList,
    chrome: PageChrome,
}

impl VariablesEditor {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: String::new(),
            value: String::new(),
            rows: EditableList::new(),
            chrome: PageChrome::new(),
        }
    }

    pub fn load<T: Transport>(&mut self, client: &ConsoleClient<T>) {
        self.chrome.show_loader();
        match client.get_variables(&self.group) {
            Ok(document) => {
                self.rows.clear();
                for (key, value) in document.entries() {
                    self.rows.push(variable_row(&key, &value));
                }
            }
            Err(_) => self.chrome.show_banner(BannerKind::Danger, GENERIC_FAILURE_MESSAGE),
        }
        self.chrome.hide_loader();
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }

    pub fn add_variable(&mut self) -> Result<RowRef> {
        if !self.can_add() {
            return Err(ConsoleError::Validation(
                "key and value are required".to_string(),
            ));
        }
        let row_ref = self.rows.push(variable_row(&self.key, &self.value));
        self.key.clear();
        self.value.clear();
        self.chrome.mark_dirty();
        Ok(row_ref)
    }

    pub fn remove_variable(&mut self, row_ref: RowRef) -> Result<()> {
        self.rows
            .remove(row_ref)
            .ok_or_else(|| ConsoleError::NotFound("variable row".to_string()))?;
        self.chrome.mark_dirty();
        Ok(())
    }

    /// Rows of `key`, oldest first.
    pub fn find(&self, key: &str) -> impl Iterator<Item = RowRef> + '_ {
        let key = key.to_string();
        self.rows
            .iter()
            .filter(move |(_, row)| row.get(FIELD_KEY) == key)
            .map(|(row_ref, _)| row_ref)
    }

    /// Serializes the rows; a key listed twice keeps its last value.
    pub fn begin_commit(&mut self) -> Result<VariablesDocument> {
        self.chrome.begin_commit()?;
        let data = self
            .rows
            .rows()
            .map(|row| {
                (
                    row.get(FIELD_KEY).to_string(),
                    serde_json::Value::String(row.get(FIELD_VALUE).to_string()),
                )
            })
            .collect();
        Ok(VariablesDocument { data: Some(data) })
    }

    pub fn finish_commit(&mut self, outcome: &Result<()>) {
        let outcome = outcome.as_ref().map(|_| ()).map_err(ConsoleError::banner_text);
        self.chrome.finish_commit(outcome, VARIABLES_UPDATED, POLICY);
    }

    pub fn commit<T: Transport>(&mut self, client: &ConsoleClient<T>) -> Result<()> {
        let document = self.begin_commit()?;
        let outcome = client.put_variables(&self.group, &document);
        self.finish_commit(&outcome);
        outcome
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowRef, &PendingRow)> {
        self.rows.iter()
    }

    #[must_use]
    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn dismiss_banner(&mut self) {
        self.chrome.dismiss_banner();
    }
}

fn variable_row(key: &str, value: &str) -> PendingRow {
    PendingRow::new([(FIELD_KEY, key), (FIELD_VALUE, value)])
}
