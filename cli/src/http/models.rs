//! HTTP API数据模型

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tasklist_core::api::TaskError;

// ============= Create =============

/// 缺失的 `text` 按空字符串处理，由服务层统一拒绝
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: String,
}

// ============= Update =============

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub completed: bool,
}

// ============= Delete / Shutdown =============

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully";

/// 关闭请求必须携带 JSON 请求体，跨域页面因此无法以简单请求触发关闭
#[derive(Debug, Default, Deserialize)]
pub struct ShutdownRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors_total: u64,
    pub timestamp: String,
}

// ============= Error Handling =============

#[derive(Debug)]
pub enum HttpServerError {
    InvalidRequest(String),
    NotFound(String),
    Storage(String),
}

impl HttpServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TaskError> for HttpServerError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(msg) => Self::InvalidRequest(msg),
            TaskError::NotFound(_) => Self::NotFound("Task not found".to_string()),
            TaskError::Storage(msg) => Self::Storage(msg),
        }
    }
}

/// 请求体无法解析（非 JSON、字段类型错误、缺少必填字段）统一视为 400
impl From<JsonRejection> for HttpServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            Self::InvalidRequest(msg) => ("VALIDATION_ERROR", msg),
            Self::NotFound(msg) => ("NOT_FOUND", msg),
            Self::Storage(msg) => ("STORAGE_ERROR", msg),
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "error_code": error_code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::api::TaskId;

    #[test]
    fn test_create_request_missing_text_defaults_to_empty() {
        let req: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.text, "");
    }

    #[test]
    fn test_create_request_rejects_non_string_text() {
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"text":42}"#).is_err());
    }

    #[test]
    fn test_update_request_requires_completed() {
        assert!(serde_json::from_str::<UpdateTaskRequest>("{}").is_err());
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(req.completed);
    }

    #[test]
    fn test_task_error_mapping() {
        let cases = [
            (TaskError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (TaskError::NotFound(TaskId::new("a")), StatusCode::NOT_FOUND),
            (
                TaskError::storage("disk"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(HttpServerError::from(err).status(), status);
        }
    }

    #[test]
    fn test_error_response_status() {
        let resp = HttpServerError::NotFound("Task not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_message_response_serialize() {
        let json = serde_json::to_string(&MessageResponse::new(TASK_DELETED_MESSAGE)).unwrap();
        assert_eq!(json, r#"{"message":"Task deleted successfully"}"#);
    }
}
