//! Group pages that collect rows locally and commit them in one write:
//! classes with their parameters, fact rules with pinned nodes, and
//! variables.
//!
//! Every editor owns its search index, autocomplete controllers and page
//! chrome. Commits run in two steps: `begin_commit` locks the commit action
//! and returns the request body, `finish_commit` applies the outcome.
//! `commit` runs both against a [`ConsoleClient`](crate::client::ConsoleClient).

use crate::error::Result;
use crate::models::SearchableRecord;
use crate::search::SearchIndex;

mod classes;
mod parameter_form;
mod rules;
mod variables;

pub use classes::{BlockRef, ClassBlock, ClassesEditor};
pub use parameter_form::{
    ParameterForm, ParameterOption, ParameterWidget, WidgetKind, sanitize_value,
};
pub use rules::RulesEditor;
pub use variables::VariablesEditor;


pub const CLASSES_UPDATED: &str = "Classes successfully updated!";
pub const RULES_UPDATED: &str = "Rules successfully updated!";
pub const VARIABLES_UPDATED: &str = "Variables successfully updated!";

/// A dataset that failed to load leaves its key empty.
fn load_dataset(index: &mut SearchIndex, key: &str, fetched: Result<Vec<SearchableRecord>>) {
    index.load(key, fetched.unwrap_or_default());
}
