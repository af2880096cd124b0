use async_trait::async_trait;

use crate::domain::errors::UpdateOutcome;
use crate::domain::models::{Task, TaskStatus};

/// Registry port for task lifecycle records.
///
/// Every operation is total: unknown ids degrade to no-ops reported through
/// the return value. Implementations serialise writes and let reads run
/// concurrently.
#[async_trait]
pub trait TaskRegistry: Send + Sync {
    /// Insert a pending task. Returns `false` (and changes nothing) if the id exists.
    async fn add(&self, id: &str, request: &str) -> bool;

    /// Move an existing task to `status` and attach `response`
    async fn update(&self, id: &str, status: TaskStatus, response: &str) -> UpdateOutcome;

    /// Point lookup
    async fn get(&self, id: &str) -> Option<Task>;

    /// Snapshot of all tasks in creation order
    async fn list_all(&self) -> Vec<Task>;

    /// Remove a task, keeping the order of the rest
    async fn delete(&self, id: &str) -> bool;

    /// Remove everything, returning how many tasks were dropped
    async fn clear(&self) -> usize;

    /// Snapshot of tasks in `status`, in creation order
    async fn list_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.list_all()
            .await
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }
}
