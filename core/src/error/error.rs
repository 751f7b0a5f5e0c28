use thiserror::Error;

use crate::model::TaskId;

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl TaskError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("server failed: {0}")]
    Server(String),
    #[error("task api failed: {0}")]
    Client(String),
    #[error("tui failed: {0}")]
    Tui(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_codes() {
        assert_eq!(TaskError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(TaskError::NotFound(TaskId::new("a")).code(), "NOT_FOUND");
        assert_eq!(TaskError::storage("disk gone").code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_task_error_display() {
        let err = TaskError::NotFound(TaskId::new("abc"));
        assert_eq!(err.to_string(), "task not found: abc");
        let err = TaskError::storage("connection reset");
        assert_eq!(err.to_string(), "storage error: connection reset");
    }
}
