//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `tasklist_core::api` instead of reaching into internal modules.

pub use crate::client::{AddOutcome, BulkDeleteReport, DeleteFailure, TaskApi, TaskClient};
pub use crate::config::{
    load, AppConfig, ClientConfig, LoggingConfig, ServerConfig, StoreConfig, StoreKind,
    TuiConfig,
};
pub use crate::context::{AppContext, RepositoryFactory};
pub use crate::error::{CliError, TaskError, TaskResult};
pub use crate::model::{Task, TaskId};
pub use crate::store::{MemoryTaskRepository, TaskRepository, TaskService};
pub use crate::view::{sorted_view, visible_tasks, Mode, ViewError, ViewState};
