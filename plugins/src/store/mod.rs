pub mod file;

pub use file::FileTaskRepository;
