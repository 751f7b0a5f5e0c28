use std::sync::Arc;

use async_trait::async_trait;

use super::r#trait::TaskRepository;
use crate::client::TaskApi;
use crate::error::{TaskError, TaskResult};
use crate::model::{normalize_text, Task, TaskId};
use crate::view::sort_incomplete_first;

/// Create / List / Update / Delete over a [`TaskRepository`].
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub fn backend(&self) -> &str {
        self.repo.name()
    }

    #[tracing::instrument(name = "store.create", skip(self, text), fields(text_len = text.len()))]
    pub async fn create(&self, text: &str) -> TaskResult<Task> {
        let text = normalize_text(text)
            .ok_or_else(|| TaskError::Validation("Task text cannot be empty".to_string()))?;
        let task = self.repo.insert(text.to_string()).await?;
        tracing::debug!(id = %task.id, "task created");
        Ok(task)
    }

    /// Incomplete first, then completed; insertion order inside each group.
    pub async fn list(&self) -> TaskResult<Vec<Task>> {
        let mut tasks = self.repo.list().await?;
        sort_incomplete_first(&mut tasks);
        Ok(tasks)
    }

    #[tracing::instrument(name = "store.update", skip(self, id), fields(id = %id))]
    pub async fn update(&self, id: &TaskId, completed: bool) -> TaskResult<Task> {
        self.repo
            .set_completed(id, completed)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.clone()))
    }

    #[tracing::instrument(name = "store.delete", skip(self, id), fields(id = %id))]
    pub async fn delete(&self, id: &TaskId) -> TaskResult<()> {
        if self.repo.remove(id).await? {
            Ok(())
        } else {
            Err(TaskError::NotFound(id.clone()))
        }
    }
}

/// In-process access to the store, bypassing HTTP.
#[async_trait]
impl TaskApi for TaskService {
    async fn create(&self, text: &str) -> anyhow::Result<Task> {
        Ok(TaskService::create(self, text).await?)
    }

    async fn list(&self) -> anyhow::Result<Vec<Task>> {
        Ok(TaskService::list(self).await?)
    }

    async fn update(&self, id: &TaskId, completed: bool) -> anyhow::Result<Task> {
        Ok(TaskService::update(self, id, completed).await?)
    }

    async fn delete(&self, id: &TaskId) -> anyhow::Result<()> {
        Ok(TaskService::delete(self, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskRepository;
    use pretty_assertions::assert_eq;

    struct BrokenRepository;

    #[async_trait]
    impl TaskRepository for BrokenRepository {
        fn name(&self) -> &str {
            "broken"
        }

        async fn insert(&self, _text: String) -> TaskResult<Task> {
            Err(TaskError::storage("connection lost"))
        }

        async fn list(&self) -> TaskResult<Vec<Task>> {
            Err(TaskError::storage("connection lost"))
        }

        async fn set_completed(&self, _id: &TaskId, _c: bool) -> TaskResult<Option<Task>> {
            Err(TaskError::storage("connection lost"))
        }

        async fn remove(&self, _id: &TaskId) -> TaskResult<bool> {
            Err(TaskError::storage("connection lost"))
        }
    }

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskRepository::new()))
    }

    #[tokio::test]
    async fn test_create_then_list_contains_one_new_record() {
        let svc = service();
        svc.create("existing").await.unwrap();

        let created = svc.create("  buy milk  ").await.unwrap();
        assert_eq!(created.text, "buy milk");
        assert!(!created.completed);

        let matching: Vec<_> = svc
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.text == "buy milk")
            .collect();
        assert_eq!(matching, vec![created]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_text_without_writing() {
        let svc = service();
        for text in ["", "   ", "\t\n"] {
            let err = svc.create(text).await.unwrap_err();
            assert!(matches!(err, TaskError::Validation(_)));
        }
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_is_not_idempotent() {
        let svc = service();
        let a = svc.create("same").await.unwrap();
        let b = svc.create("same").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(svc.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let svc = service();
        let task = svc.create("walk dog").await.unwrap();

        let done = svc.update(&task.id, true).await.unwrap();
        assert!(done.completed);
        let undone = svc.update(&task.id, false).await.unwrap();
        assert_eq!(undone, task);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let svc = service();
        let err = svc.update(&TaskId::new("missing"), true).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(id) if id.as_str() == "missing"));
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let svc = service();
        let task = svc.create("temp").await.unwrap();
        svc.delete(&task.id).await.unwrap();

        assert!(svc.list().await.unwrap().iter().all(|t| t.id != task.id));
        let err = svc.delete(&task.id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_orders_incomplete_first() {
        let svc = service();
        let a = svc.create("a").await.unwrap();
        svc.create("b").await.unwrap();
        svc.create("c").await.unwrap();
        svc.update(&a.id, true).await.unwrap();

        let texts: Vec<_> = svc.list().await.unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_storage_faults_surface_as_storage_errors() {
        let svc = TaskService::new(Arc::new(BrokenRepository));
        assert!(matches!(svc.list().await, Err(TaskError::Storage(_))));
        assert!(matches!(svc.create("x").await, Err(TaskError::Storage(_))));
        let id = TaskId::new("a");
        assert!(matches!(svc.update(&id, true).await, Err(TaskError::Storage(_))));
        assert!(matches!(svc.delete(&id).await, Err(TaskError::Storage(_))));
    }

    #[tokio::test]
    async fn test_validation_precedes_storage() {
        let svc = TaskService::new(Arc::new(BrokenRepository));
        assert!(matches!(svc.create(" ").await, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn test_task_api_wraps_task_error() {
        let svc = service();
        let err = TaskApi::delete(&svc, &TaskId::new("x")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TaskError>(),
            Some(TaskError::NotFound(_))
        ));
    }
}
