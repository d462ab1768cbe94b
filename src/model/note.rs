//! Voice note entity

use super::types::NoteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded and summarized voice note, embedded on a member or lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceNote {
    pub id: NoteId,
    pub summary: String,
    pub transcript_snippet: String,
    pub recording_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub status: String,
    /// Free-text follow-ups extracted from the recording; each can be
    /// converted into a task or dismissed
    pub action_items: Vec<String>,
    pub audio_url: Option<String>,
}

impl VoiceNote {
    pub fn new(
        id: NoteId,
        summary: impl Into<String>,
        transcript_snippet: impl Into<String>,
        recording_date: DateTime<Utc>,
    ) -> Self {
        VoiceNote {
            id,
            summary: summary.into(),
            transcript_snippet: transcript_snippet.into(),
            recording_date,
            tags: Vec::new(),
            status: "New".to_string(),
            action_items: Vec::new(),
            audio_url: None,
        }
    }

    /// Remove one action item by exact text. Removing an item that is not
    /// present is a no-op. Returns whether anything was removed.
    pub fn remove_action_item(&mut self, item: &str) -> bool {
        let before = self.action_items.len();
        self.action_items.retain(|a| a != item);
        self.action_items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_action_item_is_idempotent() {
        let mut note = VoiceNote::new(NoteId::new("n1"), "sum", "snippet", Utc::now());
        note.action_items = vec!["call back".to_string(), "send quote".to_string()];

        assert!(note.remove_action_item("call back"));
        assert_eq!(note.action_items, vec!["send quote".to_string()]);

        // Already removed: no-op, no panic
        assert!(!note.remove_action_item("call back"));
        assert_eq!(note.action_items.len(), 1);

        // Empty list stays a no-op
        note.action_items.clear();
        assert!(!note.remove_action_item("anything"));
    }
}
