//! Ordered, append-only conversation log with a bounded outbound view.

use crate::models::{HistoryEntry, Turn};

/// Owner of the conversation log. Turns are appended, never edited or
/// reordered; log order is the conversation's causal order.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the log. Always succeeds.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The last `n` turns (fewer if the log is shorter), oldest first,
    /// projected to role + content for outbound requests.
    pub fn windowed_history(&self, n: usize) -> Vec<HistoryEntry> {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..].iter().map(HistoryEntry::from).collect()
    }

    /// Read-only view of the full log.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Explicit session reset. Not part of the regular conversation flow.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
