//! Suggestion list bound to one text input.
//!
//! Transitions:
//!
//! | event               | from               | to       |
//! |---------------------|--------------------|----------|
//! | `Focus`             | any                | Querying |
//! | `KeyUp`             | Querying, Selected | Querying |
//! | `KeyUp`             | Closed             | Closed   |
//! | `SuggestionClicked` | Querying, Selected | Selected |
//! | `Blur`              | any                | unchanged, or Querying when it clears the selection |
//! | `OutsideClick`      | any                | Closed   |
//!
//! A blur clears the visible text unless a suggestion was clicked since the
//! last focus or keystroke. The list stays open across the blur, so a click
//! delivered after the blur still selects; a blur delivered after the click
//! sees the latch and keeps the values. Every keystroke drops the
//! selection, and only suggestions still enabled in the index can be picked.

use serde::Serialize;

use crate::models::RecordId;
use crate::search::{Matcher, SearchIndex, Suggestion};

mod geometry;

pub use geometry::{LIST_Z_INDEX, ListPlacement, Rect};

#[cfg(test)]
mod tests;

pub const NOTHING_FOUND_LABEL: &str = "Nothing found";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Focus { bounds: Rect, scroll_y: f32 },
    KeyUp { text: String },
    SuggestionClicked { record_id: RecordId },
    Blur,
    OutsideClick,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Closed,
    Querying,
    Selected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SuggestionList {
    #[default]
    Empty,
    Items(Vec<Suggestion>),
    NothingFound,
}

impl SuggestionList {
    fn from_results(results: Vec<Suggestion>) -> Self {
        if results.is_empty() {
            Self::NothingFound
        } else {
            Self::Items(results)
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Suggestion] {
        match self {
            Self::Items(items) => items,
            Self::Empty | Self::NothingFound => &[],
        }
    }
}

/// Values written into the paired hidden-id and visible-label fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub record_id: RecordId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct AutocompleteController {
    dataset: String,
    display_field: String,
    width_pad: f32,
    state: ControllerState,
    focused: bool,
    selection_latch: bool,
    input_text: String,
    selection: Option<Selection>,
    placement: Option<ListPlacement>,
    list: SuggestionList,
    last_error: Option<String>,
}

impl AutocompleteController {
    /// Controller searching `dataset` on the record `name`.
    pub fn new(dataset: impl Into<String>, width_pad: f32) -> Self {
        Self::with_display_field(dataset, "name", width_pad)
    }

    pub fn with_display_field(
        dataset: impl Into<String>,
        display_field: impl Into<String>,
        width_pad: f32,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            display_field: display_field.into(),
            width_pad,
            state: ControllerState::Closed,
            focused: false,
            selection_latch: false,
            input_text: String::new(),
            selection: None,
            placement: None,
            list: SuggestionList::Empty,
            last_error: None,
        }
    }

    /// Applies one input event. Returns the selection when the event was a
    /// click on a listed suggestion.
    pub fn handle(
        &mut self,
        event: InputEvent,
        index: &SearchIndex,
        matcher: &Matcher,
    ) -> Option<Selection> {
        match event {
            InputEvent::Focus { bounds, scroll_y } => {
                self.focused = true;
                self.selection_latch = false;
                self.state = ControllerState::Querying;
                self.placement = Some(ListPlacement::below(bounds, scroll_y, self.width_pad));
                self.refresh("", index, matcher);
                None
            }
            InputEvent::KeyUp { text } => {
                self.selection_latch = false;
                self.selection = None;
                if self.state == ControllerState::Closed {
                    self.input_text = text;
                    return None;
                }
                self.state = ControllerState::Querying;
                self.refresh(&text, index, matcher);
                self.input_text = text;
                None
            }
            InputEvent::SuggestionClicked { record_id } => self.select(&record_id, index),
            InputEvent::Blur => {
                if self.focused && !self.selection_latch {
                    self.input_text.clear();
                    self.selection = None;
                    if self.state == ControllerState::Selected {
                        self.state = ControllerState::Querying;
                    }
                }
                self.focused = false;
                self.selection_latch = false;
                None
            }
            InputEvent::OutsideClick => {
                self.close();
                None
            }
        }
    }

    pub fn close(&mut self) {
        self.state = ControllerState::Closed;
    }

    /// Clears and closes the input after its selection was consumed by a
    /// list editor.
    pub fn reset(&mut self) {
        self.input_text.clear();
        self.selection = None;
        self.selection_latch = false;
        self.close();
    }

    fn select(&mut self, record_id: &RecordId, index: &SearchIndex) -> Option<Selection> {
        if self.state == ControllerState::Closed {
            return None;
        }
        let enabled = index
            .query(&self.dataset)
            .iter()
            .any(|record| &record.id == record_id && record.is_enabled());
        if !enabled {
            return None;
        }
        let suggestion = self
            .list
            .items()
            .iter()
            .find(|suggestion| &suggestion.record_id == record_id)?;
        let selection = Selection {
            record_id: suggestion.record_id.clone(),
            label: suggestion.label.clone(),
        };
        self.input_text = selection.label.clone();
        self.selection = Some(selection.clone());
        self.selection_latch = true;
        self.state = ControllerState::Selected;
        Some(selection)
    }

    fn refresh(&mut self, query: &str, index: &SearchIndex, matcher: &Matcher) {
        match matcher.filter(query, index.query(&self.dataset), &self.display_field) {
            Ok(results) => {
                self.list = SuggestionList::from_results(results);
                self.last_error = None;
            }
            // The previous suggestions stay on screen, as when a keystroke
            // handler fails mid-render.
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    #[must_use]
    pub fn display_field(&self) -> &str {
        &self.display_field
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state != ControllerState::Closed
    }

    #[must_use]
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Hidden-id and visible-label pair, set only by a suggestion click.
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn placement(&self) -> Option<ListPlacement> {
        self.placement
    }

    #[must_use]
    pub fn list(&self) -> &SuggestionList {
        &self.list
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
