//! Task Store: persistence seam, in-memory backend and the validating service on top.

pub mod memory;
pub mod service;
pub mod r#trait;

pub use memory::MemoryTaskRepository;
pub use r#trait::TaskRepository;
pub use service::TaskService;
