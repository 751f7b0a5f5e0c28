//! HTTP服务器状态管理

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tasklist_core::api::TaskService;
use tokio::sync::broadcast;

/// 应用状态（在所有handlers间共享）
#[derive(Clone)]
pub struct AppState {
    pub service: TaskService,
    pub stats: Arc<RwLock<ServerStats>>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(service: TaskService, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            service,
            stats: Arc::new(RwLock::new(ServerStats::new())),
            shutdown_tx,
        }
    }

    /// 记录一次请求；锁中毒时跳过统计而不是让请求失败
    pub fn record_request(&self, endpoint: &str) {
        if let Ok(mut stats) = self.stats.write() {
            stats.increment_request(endpoint);
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.increment_error();
        }
    }
}

/// 服务器统计信息
pub struct ServerStats {
    pub requests_total: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors_total: u64,
    pub start_time: DateTime<Local>,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            requests_total: 0,
            requests_by_endpoint: BTreeMap::new(),
            errors_total: 0,
            start_time: Local::now(),
        }
    }

    pub fn increment_request(&mut self, endpoint: &str) {
        self.requests_total += 1;
        *self
            .requests_by_endpoint
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    pub fn increment_error(&mut self) {
        self.errors_total += 1;
    }

    pub fn uptime_seconds(&self) -> f64 {
        let now = Local::now();
        (now - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::api::MemoryTaskRepository;

    #[test]
    fn test_server_stats_new() {
        let stats = ServerStats::new();
        assert_eq!(stats.requests_total, 0);
        assert_eq!(stats.errors_total, 0);
        assert!(stats.uptime_seconds() < 1.0);
    }

    #[test]
    fn test_increment_request() {
        let mut stats = ServerStats::new();
        stats.increment_request("GET /tasks");
        stats.increment_request("GET /tasks");
        stats.increment_request("POST /tasks");

        assert_eq!(stats.requests_total, 3);
        assert_eq!(*stats.requests_by_endpoint.get("GET /tasks").unwrap(), 2);
        assert_eq!(*stats.requests_by_endpoint.get("POST /tasks").unwrap(), 1);
    }

    #[test]
    fn test_app_state_records_into_shared_stats() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let service = TaskService::new(Arc::new(MemoryTaskRepository::new()));
        let state = AppState::new(service, shutdown_tx);
        let clone = state.clone();

        state.record_request("GET /tasks");
        clone.record_error();

        let stats = state.stats.read().unwrap();
        assert_eq!(stats.requests_total, 1);
        assert_eq!(stats.errors_total, 1);
    }
}
