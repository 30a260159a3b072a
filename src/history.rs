use chrono::{DateTime, Local};
use serde::Serialize;

use crate::label::ClassLabel;

/// One successful classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry
{
    pub filename: String,
    pub prediction: ClassLabel,
    pub classified_at: DateTime<Local>,
}

/// The classifications made during one user session, oldest first.
/// Entries are only ever appended; nothing is persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History
{
    entries: Vec<HistoryEntry>,
}

impl History
{
    pub fn new() -> Self
    {
        History::default()
    }

    /// Appends a successful classification. Failed classifications must not be recorded.
    pub fn record(&mut self, filename: impl Into<String>, prediction: ClassLabel) -> &HistoryEntry
    {
        self.entries.push(HistoryEntry {
            filename: filename.into(),
            prediction,
            classified_at: Local::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Entries in the order they were recorded.
    pub fn entries(&self) -> &[HistoryEntry]
    {
        &self.entries
    }

    /// Entries in display order: the most recent classification first.
    pub fn recent_first(&self) -> impl Iterator<Item = &HistoryEntry>
    {
        self.entries.iter().rev()
    }
}
