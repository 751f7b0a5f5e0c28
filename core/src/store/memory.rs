use async_trait::async_trait;
use tokio::sync::RwLock;

use super::r#trait::TaskRepository;
use crate::error::TaskResult;
use crate::model::{Task, TaskId};

#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, text: String) -> TaskResult<Task> {
        let task = Task::new(TaskId::generate(), text);
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> TaskResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|t| &t.id == id).map(|t| {
            t.completed = completed;
            t.clone()
        }))
    }

    async fn remove(&self, id: &TaskId) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        Ok(tasks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_keeps_insertion_order() {
        let repo = MemoryTaskRepository::new();
        let a = repo.insert("a".into()).await.unwrap();
        let b = repo.insert("b".into()).await.unwrap();
        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn test_set_completed_unknown_id() {
        let repo = MemoryTaskRepository::new();
        let res = repo.set_completed(&TaskId::new("nope"), true).await.unwrap();
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let repo = MemoryTaskRepository::new();
        let t = repo.insert("x".into()).await.unwrap();
        assert!(repo.remove(&t.id).await.unwrap());
        assert!(!repo.remove(&t.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
