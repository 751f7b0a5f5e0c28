pub mod api;
pub mod factory;
pub mod services;
pub mod store;
