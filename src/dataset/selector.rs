//! Record selection by group prefix and required annotation.

use serde::{Deserialize, Serialize};

use super::{Record, RequiredField};

/// Which records of the canonical store get a batch request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Only keep ids of the form `"<group_filter>|..."`. `None` keeps all groups.
    pub group_filter: Option<String>,
    /// Drop records whose list attribute is empty. `None` disables the check.
    pub required_field: Option<RequiredField>,
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group_filter = Some(group.into());
        self
    }

    pub fn with_required_field(mut self, field: RequiredField) -> Self {
        self.required_field = Some(field);
        self
    }

    /// Why `record` would be dropped, or `None` when it is kept.
    pub fn rejection(&self, record: &Record) -> Option<Rejection> {
        if let Some(group) = &self.group_filter {
            if !record.in_group(group) {
                return Some(Rejection::GroupMismatch);
            }
        }
        if let Some(field) = self.required_field {
            if record.annotations(field).is_empty() {
                return Some(Rejection::MissingField(field));
            }
        }
        None
    }

    pub fn keeps(&self, record: &Record) -> bool {
        self.rejection(record).is_none()
    }
}

/// Reason a record was left out of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    GroupMismatch,
    MissingField(RequiredField),
}

/// A selected record together with its canonical index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selected<'a> {
    pub index: usize,
    pub record: &'a Record,
}

/// Ordered selection result plus drop counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection<'a> {
    pub considered: usize,
    pub dropped_by_group: usize,
    pub dropped_missing_field: usize,
    pub items: Vec<Selected<'a>>,
}

impl<'a> Selection<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Canonical indices of the selected records.
    pub fn indices(&self) -> Vec<usize> {
        self.items.iter().map(|s| s.index).collect()
    }
}

/// Select records in canonical order.
///
/// Duplicates pass through unchanged and an empty result is not an error.
pub fn select<'a>(records: &'a [Record], config: &SelectionConfig) -> Selection<'a> {
    let mut selection = Selection {
        considered: records.len(),
        ..Selection::default()
    };

    for (index, record) in records.iter().enumerate() {
        match config.rejection(record) {
            None => selection.items.push(Selected { index, record }),
            Some(Rejection::GroupMismatch) => selection.dropped_by_group += 1,
            Some(Rejection::MissingField(_)) => selection.dropped_missing_field += 1,
        }
    }

    match &config.group_filter {
        Some(group) => tracing::info!(
            group = %group,
            selected = selection.len(),
            considered = selection.considered,
            "Found records with id starting with '{}|'",
            group
        ),
        None => tracing::info!(
            selected = selection.len(),
            considered = selection.considered,
            "Processing all groups"
        ),
    }
    if selection.dropped_missing_field > 0 {
        tracing::debug!(
            dropped = selection.dropped_missing_field,
            field = ?config.required_field,
            "Skipped records without required annotations"
        );
    }

    selection
}
