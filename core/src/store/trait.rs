use async_trait::async_trait;

use crate::error::TaskResult;
use crate::model::{Task, TaskId};

/// One flat collection of task records.
///
/// Every write is individually atomic. Nothing here validates input; that is
/// [`TaskService`](super::TaskService)'s job, and it runs before any write.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    fn name(&self) -> &str;

    /// Persists a new record with `completed = false` and a fresh id.
    async fn insert(&self, text: String) -> TaskResult<Task>;

    /// All records in insertion order.
    async fn list(&self) -> TaskResult<Vec<Task>>;

    /// `Ok(None)` when no record has this id.
    async fn set_completed(&self, id: &TaskId, completed: bool) -> TaskResult<Option<Task>>;

    /// `Ok(false)` when no record has this id.
    async fn remove(&self, id: &TaskId) -> TaskResult<bool>;
}
