//! RepositoryFactory 实现：按 `[store]` 配置构建任务存储后端，供 CLI 复用。
use std::sync::Arc;

use async_trait::async_trait;
use tasklist_core::api::{RepositoryFactory, StoreConfig, TaskRepository};

use crate::factory;

pub struct PluginRepositoryFactory;

impl Default for PluginRepositoryFactory {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl RepositoryFactory for PluginRepositoryFactory {
    async fn build_repository(&self, cfg: &StoreConfig) -> anyhow::Result<Arc<dyn TaskRepository>> {
        factory::build_repository(cfg).await
    }
}
