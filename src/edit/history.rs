//! Edit-log history.
//!
//! The log is authoritative: the visible layers are re-derived from the log prefix up to the
//! cursor, so undo and redo never lose the split between template and user content.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::edit::stroke::Stroke;
use crate::edit::text::TextItem;
use crate::foundation::color::Rgb8;
use crate::foundation::error::{ArborError, ArborResult};

/// One completed edit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// A stage became active.
    StageEntered,
    /// A pen or eraser stroke was committed.
    StrokeAdded(Stroke),
    /// A pending text item was confirmed.
    TextConfirmed(TextItem),
    /// A template part was filled with a color.
    PartRecolored {
        /// Part index.
        part: usize,
        /// Fill color.
        color: Rgb8,
    },
}

/// A logged edit and the stage it happened in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Monotonic ordinal, never reused.
    pub ordinal: u64,
    /// Active stage when the edit happened.
    pub stage: usize,
    /// The edit.
    pub op: EditOp,
}

/// Document content produced by replaying a log prefix.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentState {
    /// Stage of the last replayed entry.
    pub stage: Option<usize>,
    /// Committed strokes in order.
    pub strokes: Vec<Stroke>,
    /// Confirmed text items in order.
    pub texts: Vec<TextItem>,
    /// Latest fill color per part.
    pub fills: BTreeMap<usize, Rgb8>,
}

impl DocumentState {
    fn apply(&mut self, entry: &HistoryEntry) {
        self.stage = Some(entry.stage);
        match &entry.op {
            EditOp::StageEntered => {}
            EditOp::StrokeAdded(s) => self.strokes.push(s.clone()),
            EditOp::TextConfirmed(t) => self.texts.push(t.clone()),
            EditOp::PartRecolored { part, color } => {
                self.fills.insert(*part, *color);
            }
        }
    }
}

/// Linear undo/redo over an edit log.
#[derive(Clone, Debug, Default)]
pub struct History {
    baseline: DocumentState,
    entries: Vec<HistoryEntry>,
    step: usize,
    next_ordinal: u64,
    limit: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries (minimum 1).
    ///
    /// Older entries are folded into a baseline, so replay stays lossless but they can no longer
    /// be undone.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Append an edit, discarding any redo branch.
    pub fn record(&mut self, stage: usize, op: EditOp) -> &HistoryEntry {
        if !self.entries.is_empty() {
            self.entries.truncate(self.step + 1);
        }
        self.entries.push(HistoryEntry {
            ordinal: self.next_ordinal,
            stage,
            op,
        });
        self.next_ordinal += 1;

        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                let oldest = self.entries.remove(0);
                self.baseline.apply(&oldest);
            }
        }
        self.step = self.entries.len() - 1;
        tracing::debug!(step = self.step, len = self.entries.len(), "history recorded");
        &self.entries[self.step]
    }

    /// Move the cursor back one entry. Returns `false` at the first entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Move the cursor forward one entry. Returns `false` at the last entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.step += 1;
        true
    }

    /// Whether [`History::undo`] would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    /// Whether [`History::redo`] would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len()
    }

    /// Cursor position. Meaningful only when the history is non-empty.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn entry(&self, index: usize) -> ArborResult<&HistoryEntry> {
        self.entries.get(index).ok_or(ArborError::HistoryBounds {
            step: index,
            len: self.entries.len(),
        })
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.step)
    }

    /// Fold the baseline and every entry up to the cursor.
    pub fn replay(&self) -> DocumentState {
        let mut state = self.baseline.clone();
        if let Some(prefix) = self.entries.get(..=self.step) {
            for e in prefix {
                state.apply(e);
            }
        }
        state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/history.rs"]
mod tests;
