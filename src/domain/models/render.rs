//! Render announcements: what the agent publishes for the operator to answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty notes that mean "nothing to report" and are not displayed.
const EMPTY_DIFFICULTY_MARKERS: &[&str] = &["none", "n/a", "无", "无困难"];

/// A status report published by the agent and awaiting an operator decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderAnnouncement {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulties: Option<String>,
    /// Suggested replies, in the order the agent gave them
    #[serde(default)]
    pub next_options: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl RenderAnnouncement {
    pub fn new(summary: impl Into<String>, next_options: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id: None,
            summary: summary.into(),
            difficulties: None,
            next_options,
            published_at: Utc::now(),
        }
    }

    /// Attach a difficulty note; sentinel values such as "none" are dropped.
    pub fn with_difficulties(mut self, difficulties: Option<&str>) -> Self {
        self.difficulties = normalize_difficulties(difficulties);
        self
    }

    pub fn with_conversation(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id.filter(|c| !c.trim().is_empty());
        self
    }

    /// Option text at `index`, if in range.
    pub fn option(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.next_options.get(i))
            .map(String::as_str)
    }
}

fn normalize_difficulties(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if EMPTY_DIFFICULTY_MARKERS.contains(&lowered.as_str()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Interpret the `nextOptions` argument of the tool call.
///
/// Accepts a JSON array, or a string holding a JSON array. Anything else is
/// kept as a single option made of the raw text.
pub fn parse_next_options(raw: &serde_json::Value) -> Vec<String> {
    match raw {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items.iter().map(option_text).collect(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
                Ok(items) => items.iter().map(option_text).collect(),
                Err(_) => vec![s.clone()],
            }
        }
        other => vec![other.to_string()],
    }
}

fn option_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
