//! Task lifecycle core: records, store service, client cache and view state.

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod store;
pub mod view;
