//! Group creation form: master zone select driving the environment select,
//! and the tag input.

use serde::Serialize;

use crate::client::{ConsoleClient, Transport};
use crate::models::EnvironmentSummary;

pub const MASTER_ZONE_PLACEHOLDER: &str = "Select a Master zone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum EnvironmentOptions {
    /// Only the [`MASTER_ZONE_PLACEHOLDER`] entry is shown.
    Placeholder,
    Loaded(Vec<EnvironmentSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupForm {
    master_zone: Option<String>,
    environments: EnvironmentOptions,
    tags: Vec<String>,
}

impl Default for GroupForm {
    fn default() -> Self {
        Self {
            master_zone: None,
            environments: EnvironmentOptions::Placeholder,
            tags: Vec::new(),
        }
    }
}

impl GroupForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads the environment options for the chosen master zone. An empty
    /// choice or a failed fetch falls back to the placeholder.
    pub fn select_master_zone<T: Transport>(&mut self, client: &ConsoleClient<T>, master_zone: &str) {
        if master_zone.is_empty() {
            self.master_zone = None;
            self.environments = EnvironmentOptions::Placeholder;
            return;
        }
        self.master_zone = Some(master_zone.to_string());
        match client.list_environments(master_zone) {
            Ok(environments) => self.environments = EnvironmentOptions::Loaded(environments),
            Err(_) => self.environments = EnvironmentOptions::Placeholder,
        }
    }

    /// Adds a tag with double quotes removed; blank tags are dropped.
    pub fn add_tag(&mut self, raw: &str) -> Option<&str> {
        let tag = sanitize_tag(raw);
        if tag.trim().is_empty() || self.tags.contains(&tag) {
            return None;
        }
        self.tags.push(tag);
        self.tags.last().map(String::as_str)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    #[must_use]
    pub fn master_zone(&self) -> Option<&str> {
        self.master_zone.as_deref()
    }

    #[must_use]
    pub fn environments(&self) -> &EnvironmentOptions {
        &self.environments
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[must_use]
pub fn sanitize_tag(raw: &str) -> String {
    raw.replace('"', "")
}
