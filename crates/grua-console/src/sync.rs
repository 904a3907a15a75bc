//! Master-zone data sync trigger.

use crate::client::{ConsoleClient, Transport};
use crate::error::Result;
use crate::page::{Banner, BannerKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterZone {
    pub id: String,
    pub label: String,
}

/// Sync buttons of the master-zone page and the banner they drive.
#[derive(Debug, Default)]
pub struct MasterZoneSync {
    banner: Option<Banner>,
}

impl MasterZoneSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the backend to resync `zone` and reports the outcome in the
    /// banner. The backend error is returned as well.
    pub fn trigger<T: Transport>(
        &mut self,
        client: &ConsoleClient<T>,
        zone: &MasterZone,
    ) -> Result<()> {
        let outcome = client.refresh_master_zone(&zone.id);
        self.banner = Some(match &outcome {
            Ok(()) => Banner {
                kind: BannerKind::Success,
                text: format!("Data sync started in Master Zone: {}", zone.label),
            },
            Err(_) => Banner {
                kind: BannerKind::Danger,
                text: format!(
                    "A problem ocurred starting sync in Master Zone: {}",
                    zone.label
                ),
            },
        });
        outcome
    }

    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}
