//! Page-level state shared by every editor: dirty flag, commit action,
//! loader and banner.

use serde::Serialize;

use crate::error::{ConsoleError, Result};

mod list;

pub use list::{EditableList, PendingRow, RowRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

/// Whether a failed commit makes the commit action clickable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPolicy {
    pub rearm_on_failure: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageChrome {
    dirty: bool,
    commit_enabled: bool,
    commit_in_flight: bool,
    loading: bool,
    banner: Option<Banner>,
}

impl PageChrome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the commit bar and enables the commit action.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.commit_enabled = true;
    }

    /// Locks the commit action until [`PageChrome::finish_commit`].
    pub fn begin_commit(&mut self) -> Result<()> {
        if !self.commit_enabled || self.commit_in_flight {
            return Err(ConsoleError::CommitLocked);
        }
        self.commit_enabled = false;
        self.commit_in_flight = true;
        self.loading = true;
        Ok(())
    }

    pub fn finish_commit(
        &mut self,
        outcome: std::result::Result<(), String>,
        success_message: &str,
        policy: CommitPolicy,
    ) {
        self.commit_in_flight = false;
        self.loading = false;
        match outcome {
            Ok(()) => {
                self.dirty = false;
                self.show_banner(BannerKind::Success, success_message);
            }
            Err(message) => {
                if policy.rearm_on_failure {
                    self.commit_enabled = true;
                }
                self.show_banner(BannerKind::Danger, &message);
            }
        }
    }

    pub fn show_loader(&mut self) {
        self.loading = true;
    }

    pub fn hide_loader(&mut self) {
        self.loading = false;
    }

    pub fn show_banner(&mut self, kind: BannerKind, text: &str) {
        self.banner = Some(Banner {
            kind,
            text: text.to_string(),
        });
    }

    /// A click on the banner hides it.
    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn commit_enabled(&self) -> bool {
        self.commit_enabled
    }

    #[must_use]
    pub fn commit_in_flight(&self) -> bool {
        self.commit_in_flight
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }
}
