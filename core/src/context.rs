use crate::config::{AppConfig, StoreConfig};
use crate::store::{TaskRepository, TaskService};
use std::sync::Arc;

#[async_trait::async_trait]
pub trait RepositoryFactory: Send + Sync {
    async fn build_repository(&self, cfg: &StoreConfig) -> anyhow::Result<Arc<dyn TaskRepository>>;
}

#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    repository_factory: Option<Arc<dyn RepositoryFactory>>,
}

impl AppContext {
    pub fn new(cfg: AppConfig, repository_factory: Option<Arc<dyn RepositoryFactory>>) -> Self {
        Self {
            cfg,
            repository_factory,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn with_config(&self, cfg: AppConfig) -> Self {
        Self {
            cfg,
            repository_factory: self.repository_factory.clone(),
        }
    }

    pub async fn build_service(&self, cfg: &StoreConfig) -> anyhow::Result<TaskService> {
        let Some(factory) = self.repository_factory.as_ref() else {
            anyhow::bail!("repository_factory missing (cannot build task store)");
        };
        let repo = factory.build_repository(cfg).await?;
        tracing::info!(backend = repo.name(), "task store ready");
        Ok(TaskService::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskRepository;

    struct MemoryOnly;

    #[async_trait::async_trait]
    impl RepositoryFactory for MemoryOnly {
        async fn build_repository(
            &self,
            _cfg: &StoreConfig,
        ) -> anyhow::Result<Arc<dyn TaskRepository>> {
            Ok(Arc::new(MemoryTaskRepository::new()))
        }
    }

    #[tokio::test]
    async fn test_build_service_without_factory_fails() {
        let ctx = AppContext::new(AppConfig::default(), None);
        assert!(ctx.build_service(&StoreConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_build_service_uses_factory() {
        let ctx = AppContext::new(AppConfig::default(), Some(Arc::new(MemoryOnly)));
        let svc = ctx.build_service(&ctx.cfg().store).await.unwrap();
        assert_eq!(svc.backend(), "memory");
    }
}
