mod load;
mod types;

pub use load::{get_tasklist_data_dir, load, load_from_path};
pub use types::{
    AppConfig, ClientConfig, LoggingConfig, ServerConfig, StoreConfig, StoreKind, TuiConfig,
};
