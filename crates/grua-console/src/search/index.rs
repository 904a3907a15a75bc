use std::collections::BTreeMap;

use crate::models::{ActivationState, RecordId, SearchableRecord};

pub const DATASET_CLASSES: &str = "classes";
pub const DATASET_CERTNAME: &str = "certname";
pub const DATASET_FACTS: &str = "facts";

/// Records per dataset key.
///
/// The set of ids under a key only changes through [`SearchIndex::load`];
/// everything else toggles activation in place.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    datasets: BTreeMap<String, Vec<SearchableRecord>>,
}

impl SearchIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the records of `key`. Later duplicates of an id are dropped.
    pub fn load(&mut self, key: &str, records: Vec<SearchableRecord>) {
        let mut seen = std::collections::HashSet::new();
        let unique = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();
        self.datasets.insert(key.to_string(), unique);
    }

    /// Returns `true` when a record changed. Unknown keys and ids are ignored
    /// because rows can reference records before their dataset arrives.
    pub fn set_state(&mut self, key: &str, id: &RecordId, state: ActivationState) -> bool {
        let Some(record) = self
            .datasets
            .get_mut(key)
            .and_then(|records| records.iter_mut().find(|record| &record.id == id))
        else {
            return false;
        };
        let changed = record.state != state;
        record.state = state;
        changed
    }

    /// Toggles every record whose `field` equals `value`; returns how many
    /// changed.
    pub fn set_state_by_field(
        &mut self,
        key: &str,
        field: &str,
        value: &str,
        state: ActivationState,
    ) -> usize {
        let Some(records) = self.datasets.get_mut(key) else {
            return 0;
        };
        let mut changed = 0;
        for record in records
            .iter_mut()
            .filter(|record| record.field(field) == Some(value))
        {
            if record.state != state {
                record.state = state;
                changed += 1;
            }
        }
        changed
    }

    #[must_use]
    pub fn query(&self, key: &str) -> &[SearchableRecord] {
        self.datasets.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn find_by_field(&self, key: &str, field: &str, value: &str) -> Option<&SearchableRecord> {
        self.query(key)
            .iter()
            .find(|record| record.field(field) == Some(value))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.datasets.contains_key(key)
    }
}
