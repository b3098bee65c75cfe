//! Neighbor resolution against the canonical record sequence.

use super::Record;

/// A target record with its canonical predecessor and successor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextWindow<'a> {
    pub previous: Option<&'a Record>,
    pub target: &'a Record,
    pub next: Option<&'a Record>,
}

impl<'a> ContextWindow<'a> {
    /// Resolve the window around canonical position `index`.
    ///
    /// Returns `None` only when `index` is out of range. Neighbors come from
    /// `records` itself, never from a filtered subset.
    pub fn resolve(records: &'a [Record], index: usize) -> Option<Self> {
        let target = records.get(index)?;
        let previous = index.checked_sub(1).and_then(|i| records.get(i));
        let next = records.get(index + 1);
        Some(Self {
            previous,
            target,
            next,
        })
    }

    /// Window with no neighbors.
    pub fn isolated(target: &'a Record) -> Self {
        Self {
            previous: None,
            target,
            next: None,
        }
    }
}
