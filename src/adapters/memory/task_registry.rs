//! Process-lifetime task registry backed by an ordered vector.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::errors::UpdateOutcome;
use crate::domain::models::{Task, TaskStatus};
use crate::domain::ports::TaskRegistry;

/// In-memory task registry.
///
/// Tasks are kept in creation order. Lookups scan the vector; the registry
/// holds one entry per operator response, so it stays small.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRegistry {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRegistry for InMemoryTaskRegistry {
    async fn add(&self, id: &str, request: &str) -> bool {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == id) {
            warn!(task_id = %id, "task already registered, ignoring duplicate add");
            return false;
        }
        tasks.push(Task::new(id, request));
        debug!(task_id = %id, request = %request, "task added");
        true
    }

    async fn update(&self, id: &str, status: TaskStatus, response: &str) -> UpdateOutcome {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            warn!(task_id = %id, status = %status, "update for unknown task ignored");
            return UpdateOutcome::NotFound;
        };

        let from = task.status;
        match task.transition_to(status, response) {
            Ok(()) => {
                debug!(task_id = %id, from = %from, to = %status, "task updated");
                UpdateOutcome::Applied
            }
            Err(reason) => {
                warn!(task_id = %id, %reason, "task status regression rejected");
                UpdateOutcome::Rejected { from, to: status }
            }
        }
    }

    async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }

    async fn list_all(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    async fn delete(&self, id: &str) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                tasks.remove(index);
                debug!(task_id = %id, "task deleted");
                true
            }
            None => false,
        }
    }

    async fn clear(&self) -> usize {
        let mut tasks = self.tasks.write().await;
        let count = tasks.len();
        tasks.clear();
        debug!(count, "task registry cleared");
        count
    }
}
