//! Global emergency triage queue.
//!
//! Ordering: severity ascending, then token id ascending. Both keys are
//! integers, so extraction order is total and deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::{ScheduleError, ScheduleResult};
use crate::models::{Severity, Token, TokenId};

/// An emergency token with its urgency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageEntry {
    pub token: Token,
    pub severity: Severity,
}

impl TriageEntry {
    fn key(&self) -> (Severity, TokenId) {
        (self.severity, self.token.id)
    }
}

impl PartialEq for TriageEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TriageEntry {}

impl PartialOrd for TriageEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TriageEntry {
    /// Reversed so the max-heap yields the most urgent entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Min-priority queue over [`TriageEntry`].
#[derive(Debug, Clone, Default)]
pub struct TriageQueue {
    heap: BinaryHeap<TriageEntry>,
}

impl TriageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: Token, severity: Severity) {
        self.heap.push(TriageEntry { token, severity });
    }

    /// Remove and return the most urgent entry.
    pub fn extract_min(&mut self) -> ScheduleResult<TriageEntry> {
        self.heap.pop().ok_or(ScheduleError::QueueEmpty)
    }

    pub fn peek(&self) -> Option<&TriageEntry> {
        self.heap.peek()
    }

    /// Remove the first entry (in priority order) carrying `token_id`.
    ///
    /// Drains every entry and pushes back all but that one.
    pub fn remove_by_id(&mut self, token_id: TokenId) -> Option<TriageEntry> {
        let mut kept = Vec::with_capacity(self.heap.len());
        let mut removed = None;
        while let Some(entry) = self.heap.pop() {
            if removed.is_none() && entry.token.id == token_id {
                removed = Some(entry);
            } else {
                kept.push(entry);
            }
        }
        self.heap.extend(kept);
        removed
    }

    /// Entries in extraction order, without removing them.
    pub fn iter_sorted(&self) -> Vec<&TriageEntry> {
        let mut entries: Vec<&TriageEntry> = self.heap.iter().collect();
        entries.sort_by_key(|e| e.key());
        entries
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
