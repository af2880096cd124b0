//! Task domain model.
//!
//! A task is the lifecycle record of one operator response: it is created
//! when the response is accepted, relayed to the agent, and closed when the
//! agent reports back (or immediately, when the operator ends the conversation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a task in the exchange lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Response accepted and queued, not yet picked up by the agent
    #[default]
    Pending,
    /// Agent resumed with this instruction and is working on it
    Processing,
    /// Agent reported back, or the conversation ended
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" | "complete" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Status only moves forward. Re-applying the current status is allowed so
    /// that a retried report can refresh the response text.
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        match self {
            Self::Completed => new_status == Self::Completed,
            _ => new_status >= *self,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operator-driven exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique id, assigned once by the broker's accept path
    #[serde(rename = "taskId")]
    pub id: String,
    pub status: TaskStatus,
    /// The instruction the operator gave (option text or free text)
    pub request: String,
    /// Summary attached when the agent reports back; empty until then
    pub response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task for the given instruction.
    pub fn new(id: impl Into<String>, request: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            request: request.into(),
            response: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `new_status` and attach `response`.
    pub fn transition_to(&mut self, new_status: TaskStatus, response: &str) -> Result<(), String> {
        if !self.status.can_transition_to(new_status) {
            return Err(format!(
                "Cannot transition from {} to {}",
                self.status.as_str(),
                new_status.as_str()
            ));
        }

        self.status = new_status;
        self.response = response.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}
