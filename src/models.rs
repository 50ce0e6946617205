//! Core conversation and upload types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation, authored by the user or the assistant.
///
/// Turns are immutable once appended to the conversation log. Assistant
/// turns may carry citations in `sources`; an empty list means the backend
/// returned none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub sources: Vec<String>,
}

impl Turn {
    /// Build a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    /// Build an assistant turn with optional citations.
    pub fn assistant(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
        }
    }
}

/// Outbound projection of a [`Turn`]: role and text only.
///
/// Requests never need citation metadata, so `sources` is dropped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for HistoryEntry {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// A file staged for one upload action. Transient: candidates exist only
/// for the duration of a single batch submission.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub data: Vec<u8>,
}

impl UploadCandidate {
    /// Read a candidate from disk, using the file name component as the
    /// upload name.
    pub fn from_path(path: &Path) -> crate::error::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let data = std::fs::read(path)?;
        Ok(Self {
            size_bytes: data.len() as u64,
            name,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_history_entry_drops_sources() {
        let turn = Turn::assistant("see the manual", vec!["manual.pdf".to_string()]);
        let entry = HistoryEntry::from(&turn);
        assert_eq!(entry.role, Role::Assistant);
        assert_eq!(entry.content, "see the manual");

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("sources").is_none());
    }

    #[test]
    fn test_user_turn_has_no_sources() {
        let turn = Turn::user("hello");
        assert_eq!(turn.role, Role::User);
        assert!(turn.sources.is_empty());
    }
}
