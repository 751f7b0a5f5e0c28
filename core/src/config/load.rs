use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default tasklist data directory: ~/.tasklist
pub fn get_tasklist_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".tasklist"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

/// Loads `explicit` when given, otherwise walks the default lookup order.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.tasklist/config.toml (highest)
    let data_dir = get_tasklist_data_dir()?;
    let home_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if let Some(path) = explicit {
        load_from_path(path)
            .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?
    } else if home_config.exists() {
        load_from_path(&home_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("PORT") {
        match v.trim().parse::<u16>() {
            Ok(port) => cfg.server.port = port,
            Err(e) => tracing::warn!("ignoring invalid PORT={v}: {e}"),
        }
    }
    if let Some(v) = get("TASKLIST_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = get("TASKLIST_STORE_KIND") {
        match v.parse() {
            Ok(kind) => cfg.store.kind = kind,
            Err(e) => tracing::warn!("ignoring TASKLIST_STORE_KIND: {e}"),
        }
    }
    if let Some(v) = get("TASKLIST_STORE_PATH") {
        cfg.store.path = v;
    }
    if let Some(v) = get("TASKLIST_API_URL") {
        cfg.client.base_url = v;
    }
}
