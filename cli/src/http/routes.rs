//! HTTP路由handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use tasklist_core::api::{Task, TaskError, TaskId};

use crate::http::{models::*, state::AppState};

/// 创建所有路由；任务路由同时挂载在根路径与 `/api` 下
pub fn create_router(state: AppState) -> Router {
    let tasks = task_routes();
    Router::new()
        .merge(tasks.clone())
        .nest("/api", tasks)
        .route("/health", get(health_handler))
        .route("/shutdown", post(shutdown_handler))
        .with_state(state)
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/:id",
            put(update_task_handler).delete(delete_task_handler),
        )
}

/// POST /tasks - 创建任务
async fn create_task_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), HttpServerError> {
    state.record_request("POST /tasks");

    let Json(req) = payload.map_err(|e| reject(&state, e))?;
    let task = state
        .service
        .create(&req.text)
        .await
        .map_err(|e| fail(&state, e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks - 列出全部任务（未完成在前）
async fn list_tasks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, HttpServerError> {
    state.record_request("GET /tasks");

    let tasks = state.service.list().await.map_err(|e| fail(&state, e))?;
    Ok(Json(tasks))
}

/// PUT /tasks/:id - 设置完成状态
async fn update_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, HttpServerError> {
    state.record_request("PUT /tasks/:id");

    let Json(req) = payload.map_err(|e| reject(&state, e))?;
    let task = state
        .service
        .update(&TaskId::new(id), req.completed)
        .await
        .map_err(|e| fail(&state, e))?;
    Ok(Json(task))
}

/// DELETE /tasks/:id - 删除任务
async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpServerError> {
    state.record_request("DELETE /tasks/:id");

    state
        .service
        .delete(&TaskId::new(id))
        .await
        .map_err(|e| fail(&state, e))?;
    Ok(Json(MessageResponse::new(TASK_DELETED_MESSAGE)))
}

/// GET /health - 健康检查
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (uptime_seconds, requests_handled, requests_by_endpoint, errors_total) = state
        .stats
        .read()
        .map(|s| {
            (
                s.uptime_seconds(),
                s.requests_total,
                s.requests_by_endpoint.clone(),
                s.errors_total,
            )
        })
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".into(),
        backend: state.service.backend().to_string(),
        uptime_seconds,
        requests_handled,
        requests_by_endpoint,
        errors_total,
        timestamp: Local::now().to_rfc3339(),
    })
}

/// POST /shutdown - 触发优雅关闭（需要 `Content-Type: application/json`）
async fn shutdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShutdownRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, HttpServerError> {
    let Json(req) = payload.map_err(|e| reject(&state, e))?;
    tracing::info!(reason = req.reason.as_deref().unwrap_or("unspecified"), "Shutdown requested");
    let _ = state.shutdown_tx.send(());
    Ok(Json(MessageResponse::new("Shutdown signal sent")))
}

fn fail(state: &AppState, err: TaskError) -> HttpServerError {
    state.record_error();
    if let TaskError::Storage(msg) = &err {
        tracing::error!(error = %msg, "task store fault");
    }
    err.into()
}

fn reject(state: &AppState, rejection: JsonRejection) -> HttpServerError {
    state.record_error();
    rejection.into()
}
