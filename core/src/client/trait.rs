use async_trait::async_trait;

use crate::model::{Task, TaskId};

/// What the client needs from the Task Store. Errors are opaque to the
/// client: it logs them and leaves its state unchanged.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create(&self, text: &str) -> anyhow::Result<Task>;
    async fn list(&self) -> anyhow::Result<Vec<Task>>;
    async fn update(&self, id: &TaskId, completed: bool) -> anyhow::Result<Task>;
    async fn delete(&self, id: &TaskId) -> anyhow::Result<()>;
}
