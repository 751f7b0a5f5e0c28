//! One flat JSON collection on disk.
//!
//! The whole collection is rewritten on every write through a sibling temp
//! file and a rename, and the in-memory copy only changes after the rename
//! succeeded. A failed write therefore leaves both the file and the process
//! view untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tasklist_core::api::{Task, TaskError, TaskId, TaskRepository, TaskResult};
use tokio::sync::Mutex;

pub struct FileTaskRepository {
    path: PathBuf,
    tasks: Mutex<Vec<Task>>,
}

impl FileTaskRepository {
    /// Opens `path`, treating a missing file as an empty collection.
    pub async fn open(path: impl Into<PathBuf>) -> TaskResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TaskError::Storage(format!("create {}: {e}", parent.display())))?;
        }

        let tasks = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<Task>>(&bytes)
                .map_err(|e| TaskError::Storage(format!("decode {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(TaskError::Storage(format!("read {}: {e}", path.display()))),
        };

        tracing::info!(path = %path.display(), count = tasks.len(), "file task store opened");
        Ok(Self {
            path,
            tasks: Mutex::new(tasks),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tasks: &[Task]) -> TaskResult<()> {
        let bytes = serde_json::to_vec_pretty(tasks).map_err(TaskError::storage)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| TaskError::Storage(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| TaskError::Storage(format!("rename to {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Applies `f` to a copy, persists it, then commits it in memory.
    async fn write_with<R>(&self, f: impl FnOnce(&mut Vec<Task>) -> R) -> TaskResult<R> {
        let mut guard = self.tasks.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next);
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    fn name(&self) -> &str {
        "file"
    }

    async fn insert(&self, text: String) -> TaskResult<Task> {
        let task = Task::new(TaskId::generate(), text);
        let stored = task.clone();
        self.write_with(move |tasks| tasks.push(stored)).await?;
        Ok(task)
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        Ok(self.tasks.lock().await.clone())
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> TaskResult<Option<Task>> {
        {
            let tasks = self.tasks.lock().await;
            if !tasks.iter().any(|t| &t.id == id) {
                return Ok(None);
            }
        }
        self.write_with(|tasks| {
            tasks.iter_mut().find(|t| &t.id == id).map(|t| {
                t.completed = completed;
                t.clone()
            })
        })
        .await
    }

    async fn remove(&self, id: &TaskId) -> TaskResult<bool> {
        {
            let tasks = self.tasks.lock().await;
            if !tasks.iter().any(|t| &t.id == id) {
                return Ok(false);
            }
        }
        self.write_with(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| &t.id != id);
            tasks.len() != before
        })
        .await
    }
}
