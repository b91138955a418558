//! Session history of catalog mutations.

use super::shortcut::Shortcut;

/// One catalog mutation. The log is append-only and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Added { after: Shortcut },
    Updated { before: Shortcut, after: Shortcut },
    Removed { before: Shortcut },
}

impl HistoryEntry {
    pub fn action(&self) -> &'static str {
        match self {
            HistoryEntry::Added { .. } => "added",
            HistoryEntry::Updated { .. } => "updated",
            HistoryEntry::Removed { .. } => "removed",
        }
    }

    /// Id of the shortcut the entry is about.
    pub fn id(&self) -> &str {
        match self {
            HistoryEntry::Added { after } => &after.id,
            HistoryEntry::Updated { after, .. } => &after.id,
            HistoryEntry::Removed { before } => &before.id,
        }
    }
}
