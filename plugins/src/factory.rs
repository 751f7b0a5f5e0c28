use std::sync::Arc;

use anyhow::Result;

use tasklist_core::api::{ClientConfig, MemoryTaskRepository, StoreConfig, StoreKind, TaskRepository};

use crate::api::HttpTaskApi;
use crate::store::FileTaskRepository;

pub fn expand_store_path(path: &str) -> String {
    shellexpand::tilde(path.trim()).into_owned()
}

pub async fn build_repository(cfg: &StoreConfig) -> Result<Arc<dyn TaskRepository>> {
    match cfg.kind {
        StoreKind::Memory => Ok(Arc::new(MemoryTaskRepository::new())),
        StoreKind::File => {
            let path = expand_store_path(&cfg.path);
            Ok(Arc::new(FileTaskRepository::open(path).await?))
        }
    }
}

pub fn build_api(cfg: &ClientConfig) -> Result<HttpTaskApi> {
    HttpTaskApi::new(&cfg.base_url, cfg.timeout_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_repository() {
        let cfg = StoreConfig {
            kind: StoreKind::Memory,
            path: String::new(),
        };
        let repo = build_repository(&cfg).await.unwrap();
        assert_eq!(repo.name(), "memory");
    }

    #[tokio::test]
    async fn test_build_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StoreConfig {
            kind: StoreKind::File,
            path: dir.path().join("tasks.json").to_string_lossy().to_string(),
        };
        let repo = build_repository(&cfg).await.unwrap();
        assert_eq!(repo.name(), "file");
    }

    #[test]
    fn test_expand_store_path_keeps_absolute() {
        assert_eq!(expand_store_path(" /tmp/tasks.json "), "/tmp/tasks.json");
        assert!(!expand_store_path("~/tasks.json").starts_with('~'));
    }
}
