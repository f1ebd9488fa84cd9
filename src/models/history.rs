//! Audit trail stored in `records.history`.
//!
//! The column holds a JSON array of entries. Older rows may carry plain free
//! text; that text is kept and read back as a single undated entry.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: Option<DateTime<Local>>,
    pub action: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(pub Vec<HistoryEntry>);

impl History {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<Vec<HistoryEntry>>(trimmed) {
            Ok(entries) => Self(entries),
            Err(_) => Self(vec![HistoryEntry {
                at: None,
                action: "note".to_string(),
                note: trimmed.to_string(),
            }]),
        }
    }

    pub fn push(&mut self, action: &str, note: impl Into<String>) {
        self.0.push(HistoryEntry {
            at: Some(Local::now()),
            action: action.to_string(),
            note: note.into(),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_column(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        // a Vec of plain structs always serializes
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}
