//! HTTP服务器模块 - 以 REST API 暴露任务存储

pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use models::*;
pub use server::*;
pub use state::*;
