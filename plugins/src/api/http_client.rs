use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tasklist_core::api::{Task, TaskApi, TaskError, TaskId};
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Failure talking to the Task Store. A 404 on a task URL is not one of these;
/// it surfaces as [`TaskError::NotFound`] so callers can treat it as "already gone".
#[derive(Debug, Error)]
pub enum HttpApiError {
    #[error("cannot reach task store at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("task store answered {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("unreadable response from {url}: {body}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } => None,
        }
    }

    fn transport(url: &str) -> impl FnOnce(reqwest::Error) -> Self + '_ {
        move |source| Self::Transport {
            url: url.to_string(),
            source,
        }
    }
}

/// Error body the server sends with every non-2xx answer.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    error_code: Option<String>,
}

/// Prefers the server's own `error`/`error_code`, falling back to a truncated body.
fn server_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.error_code {
            Some(code) => format!("{} ({code})", parsed.error),
            None => parsed.error,
        };
    }
    preview_body(body)
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}

/// Reads the body and turns a non-2xx status into an error. When `id` is given,
/// 404 means that task is gone.
async fn read_success(
    resp: reqwest::Response,
    id: Option<&TaskId>,
) -> anyhow::Result<(String, String)> {
    let status = resp.status();
    let url = resp.url().to_string();
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(TaskError::NotFound(id.clone()).into());
        }
    }
    let body = resp.text().await.map_err(HttpApiError::transport(&url))?;
    if !status.is_success() {
        return Err(HttpApiError::Status {
            status: status.as_u16(),
            url,
            message: server_message(&body),
        }
        .into());
    }
    Ok((url, body))
}

async fn parse_json_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    id: Option<&TaskId>,
) -> anyhow::Result<T> {
    let (url, body) = read_success(resp, id).await?;
    serde_json::from_str::<T>(&body).map_err(|source| {
        HttpApiError::Decode {
            url,
            body: preview_body(&body),
            source,
        }
        .into()
    })
}

/// [`TaskApi`] over the Task Store's HTTP interface.
#[derive(Clone)]
pub struct HttpTaskApi {
    http: reqwest::Client,
    base_url: String,
    url_tasks: String,
}

impl HttpTaskApi {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            http,
            base_url: normalized.to_string(),
            url_tasks: format!("{}/tasks", normalized),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn task_url(&self, id: &TaskId) -> String {
        format!("{}/{}", self.url_tasks, id)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn create(&self, text: &str) -> anyhow::Result<Task> {
        let url = &self.url_tasks;
        tracing::debug!(
            target: "tasklist.client",
            stage = "http.create.in",
            url = %url,
            text_len = text.len()
        );
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(HttpApiError::transport(url))?;
        let status = resp.status();
        let task: Task = parse_json_response(resp, None).await?;
        tracing::debug!(target: "tasklist.client", stage = "http.create.out", status = %status, id = %task.id);
        Ok(task)
    }

    async fn list(&self) -> anyhow::Result<Vec<Task>> {
        let url = &self.url_tasks;
        tracing::debug!(target: "tasklist.client", stage = "http.list.in", url = %url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(HttpApiError::transport(url))?;
        let status = resp.status();
        let tasks: Vec<Task> = parse_json_response(resp, None).await?;
        tracing::debug!(
            target: "tasklist.client",
            stage = "http.list.out",
            status = %status,
            count = tasks.len()
        );
        Ok(tasks)
    }

    async fn update(&self, id: &TaskId, completed: bool) -> anyhow::Result<Task> {
        let url = self.task_url(id);
        tracing::debug!(
            target: "tasklist.client",
            stage = "http.update.in",
            url = %url,
            completed = completed
        );
        let resp = self
            .http
            .put(&url)
            .json(&serde_json::json!({ "completed": completed }))
            .send()
            .await
            .map_err(HttpApiError::transport(&url))?;
        let status = resp.status();
        let task: Task = parse_json_response(resp, Some(id)).await?;
        tracing::debug!(target: "tasklist.client", stage = "http.update.out", status = %status);
        Ok(task)
    }

    async fn delete(&self, id: &TaskId) -> anyhow::Result<()> {
        let url = self.task_url(id);
        tracing::debug!(target: "tasklist.client", stage = "http.delete.in", url = %url);
        let resp = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(HttpApiError::transport(&url))?;
        let status = resp.status();
        read_success(resp, Some(id)).await?;
        tracing::debug!(target: "tasklist.client", stage = "http.delete.out", status = %status);
        Ok(())
    }
}
