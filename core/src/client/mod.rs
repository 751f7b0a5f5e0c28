pub mod client;
pub mod r#trait;

pub use client::{AddOutcome, BulkDeleteReport, DeleteFailure, TaskClient};
pub use r#trait::TaskApi;
