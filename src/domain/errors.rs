//! Domain errors for the rendezvous subsystem.

use thiserror::Error;

use super::models::TaskStatus;

/// Errors raised to callers of the broker. Overload is never an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("No render task available")]
    NothingToAnswer,

    #[error("No render task available for conversation {0}")]
    ConversationNotFound(String),

    #[error("customInput is required")]
    EmptyInput,
}

/// Errors raised by the interaction coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("format must not be empty")]
    EmptyTemplate,
}

/// Result of a registry status update. Updates never fail loudly; callers
/// branch on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NotFound,
    Rejected { from: TaskStatus, to: TaskStatus },
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(BrokerError::NothingToAnswer.to_string(), "No render task available");
        assert_eq!(
            BrokerError::ConversationNotFound("c-1".into()).to_string(),
            "No render task available for conversation c-1"
        );
    }

    #[test]
    fn test_outcome_applied() {
        assert!(UpdateOutcome::Applied.is_applied());
        assert!(!UpdateOutcome::NotFound.is_applied());
        assert!(!UpdateOutcome::Rejected {
            from: TaskStatus::Completed,
            to: TaskStatus::Pending
        }
        .is_applied());
    }
}
