use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::RecordId;

/// Stable handle of a rendered row; never reused within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RowRef(u64);

/// A row that exists only on the page until the next commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRow {
    pub fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_record_id: Option<RecordId>,
}

impl PendingRow {
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            source_record_id: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, record_id: RecordId) -> Self {
        self.source_record_id = Some(record_id);
        self
    }

    /// Field text, empty when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }
}

/// Rows in page order, addressed by [`RowRef`].
#[derive(Debug, Clone, Serialize)]
pub struct EditableList<R = PendingRow> {
    rows: Vec<(RowRef, R)>,
    #[serde(skip)]
    next_ref: u64,
}

impl<R> Default for EditableList<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_ref: 0,
        }
    }
}

impl<R> EditableList<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: R) -> RowRef {
        let row_ref = RowRef(self.next_ref);
        self.next_ref += 1;
        self.rows.push((row_ref, row));
        row_ref
    }

    pub fn remove(&mut self, row_ref: RowRef) -> Option<R> {
        let position = self.rows.iter().position(|(candidate, _)| *candidate == row_ref)?;
        Some(self.rows.remove(position).1)
    }

    #[must_use]
    pub fn get(&self, row_ref: RowRef) -> Option<&R> {
        self.rows
            .iter()
            .find(|(candidate, _)| *candidate == row_ref)
            .map(|(_, row)| row)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowRef, &R)> {
        self.rows.iter().map(|(row_ref, row)| (*row_ref, row))
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().map(|(_, row)| row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_stay_valid_after_other_rows_are_removed() {
        let mut list = EditableList::new();
        let first = list.push(PendingRow::new([("key", "a")]));
        let second = list.push(PendingRow::new([("key", "b")]));
        assert!(list.remove(first).is_some());
        assert!(list.remove(first).is_none());
        assert_eq!(list.get(second).map(|row| row.get("key")), Some("b"));

        let third = list.push(PendingRow::new([("key", "c")]));
        assert_ne!(third, first);
        assert_eq!(list.len(), 2);
    }
}
