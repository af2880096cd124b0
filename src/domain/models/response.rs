//! Operator responses and how a raw selection resolves against an announcement.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::render::RenderAnnouncement;

/// Text carried by a terminal response when the operator supplied none.
pub const END_OF_CONVERSATION: &str = "user ended conversation";

/// `selectedIndex` value meaning "free text, not one of the options".
pub const FREE_TEXT_INDEX: i64 = -1;

/// The operator's decision, as delivered to the waiting agent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Announcement this answers; absent for manually authored responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_id: Option<Uuid>,
    pub task_id: String,
    pub selected_index: i64,
    pub custom_input: String,
    #[serde(rename = "continue")]
    pub continue_flag: bool,
}

impl HumanResponse {
    pub fn new(task_id: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            conversation_id: None,
            announcement_id: None,
            task_id: task_id.into(),
            selected_index: resolution.selected_index,
            custom_input: resolution.custom_input,
            continue_flag: resolution.continue_flag,
        }
    }

    pub fn answering(mut self, announcement: &RenderAnnouncement) -> Self {
        self.announcement_id = Some(announcement.id);
        self.conversation_id.clone_from(&announcement.conversation_id);
        self
    }

    pub fn in_conversation(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    /// A response produced locally when no operator answer arrived.
    pub fn synthetic_termination(reason: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            announcement_id: None,
            task_id: String::new(),
            selected_index: FREE_TEXT_INDEX,
            custom_input: reason.into(),
            continue_flag: false,
        }
    }
}

fn default_continue() -> bool {
    true
}

/// Raw operator input before it is matched to an announcement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub selected_index: Option<i64>,
    #[serde(default)]
    pub custom_input: Option<String>,
    #[serde(rename = "continue", default = "default_continue")]
    pub continue_flag: bool,
    /// Explicit target for conversation-addressed brokers
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl Selection {
    pub fn option(index: i64) -> Self {
        Self {
            selected_index: Some(index),
            continue_flag: true,
            ..Default::default()
        }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            custom_input: Some(text.into()),
            continue_flag: true,
            ..Default::default()
        }
    }

    pub fn end_conversation() -> Self {
        Self {
            continue_flag: false,
            ..Default::default()
        }
    }

    pub fn for_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Resolve against `announcement`.
    ///
    /// An in-range index wins; otherwise non-empty free text is used; with
    /// neither, the selection ends the conversation.
    pub fn resolve(&self, announcement: &RenderAnnouncement) -> Resolution {
        if let Some(text) = self.selected_index.and_then(|i| announcement.option(i)) {
            return Resolution::normalized(
                self.selected_index.unwrap_or(FREE_TEXT_INDEX),
                text,
                self.continue_flag,
            );
        }

        match self.custom_input.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                Resolution::normalized(FREE_TEXT_INDEX, text, self.continue_flag)
            }
            _ => Resolution::normalized(FREE_TEXT_INDEX, "", false),
        }
    }
}

/// A selection matched to concrete instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub selected_index: i64,
    pub custom_input: String,
    pub continue_flag: bool,
}

impl Resolution {
    /// A manually authored response, not tied to any option.
    pub fn manual(custom_input: &str, continue_flag: bool) -> Self {
        Self::normalized(FREE_TEXT_INDEX, custom_input.trim(), continue_flag)
    }

    /// Empty instructions cannot continue, and terminal responses always
    /// carry descriptive text.
    fn normalized(selected_index: i64, text: &str, continue_flag: bool) -> Self {
        let blank = text.trim().is_empty();
        let continue_flag = continue_flag && !blank;
        let custom_input = if blank {
            END_OF_CONVERSATION.to_string()
        } else {
            text.to_string()
        };
        Self {
            selected_index,
            custom_input,
            continue_flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcement() -> RenderAnnouncement {
        RenderAnnouncement::new("built feature X", vec!["test".into(), "deploy".into()])
    }

    #[test]
    fn test_in_range_index_uses_option_text() {
        let r = Selection::option(1).resolve(&announcement());
        assert_eq!(r.custom_input, "deploy");
        assert_eq!(r.selected_index, 1);
        assert!(r.continue_flag);
    }

    #[test]
    fn test_out_of_range_index_falls_back_to_free_text() {
        let selection = Selection {
            selected_index: Some(9),
            custom_input: Some("write the changelog".into()),
            continue_flag: true,
            conversation_id: None,
        };
        let r = selection.resolve(&announcement());
        assert_eq!(r.custom_input, "write the changelog");
        assert_eq!(r.selected_index, FREE_TEXT_INDEX);
        assert!(r.continue_flag);
    }

    #[test]
    fn test_out_of_range_without_text_terminates() {
        let r = Selection::option(-3).resolve(&announcement());
        assert!(!r.continue_flag);
        assert_eq!(r.custom_input, END_OF_CONVERSATION);
        assert_eq!(r.selected_index, FREE_TEXT_INDEX);
    }

    #[test]
    fn test_terminal_always_has_text() {
        let r = Selection::end_conversation().resolve(&announcement());
        assert!(!r.continue_flag);
        assert!(!r.custom_input.is_empty());

        let r = Resolution::manual("   ", false);
        assert_eq!(r.custom_input, END_OF_CONVERSATION);
    }

    #[test]
    fn test_terminal_keeps_supplied_text() {
        let selection = Selection {
            custom_input: Some("that's all for today".into()),
            continue_flag: false,
            ..Default::default()
        };
        let r = selection.resolve(&announcement());
        assert!(!r.continue_flag);
        assert_eq!(r.custom_input, "that's all for today");
    }

    #[test]
    fn test_blank_option_text_cannot_continue() {
        let ann = RenderAnnouncement::new("s", vec![String::new()]);
        let r = Selection::option(0).resolve(&ann);
        assert!(!r.continue_flag);
        assert_eq!(r.custom_input, END_OF_CONVERSATION);
    }

    #[test]
    fn test_selection_continue_defaults_to_true() {
        let selection: Selection = serde_json::from_str(r#"{"selectedIndex": 1}"#).unwrap();
        assert!(selection.continue_flag);
        assert_eq!(selection.selected_index, Some(1));
    }

    #[test]
    fn test_response_wire_format() {
        let response = HumanResponse::new("id-3", Resolution::manual("ship it", true));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["taskId"], "id-3");
        assert_eq!(json["selectedIndex"], -1);
        assert_eq!(json["customInput"], "ship it");
        assert_eq!(json["continue"], true);
        assert!(json.get("announcementId").is_none());
    }
}
