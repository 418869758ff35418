use std::{fs, path::Path};

use serde::Deserialize;

use crate::slot::ensure_sqlite_parent_dir_exists;

pub const SETTINGS_FILE: &str = "stories.toml";

/// Keys accepted in `stories.toml`; absent keys keep the current value.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSettings {
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/stories.db".into(),
            max_connections: 5,
        }
    }
}

/// Defaults, then `stories.toml` in the working directory, then environment.
pub fn load_settings() -> StoreSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> StoreSettings {
    let mut settings = StoreSettings::default();
    apply_file_layer(&mut settings, path);
    apply_env_layer(&mut settings);
    settings
}

fn apply_file_layer(settings: &mut StoreSettings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => apply_file_values(settings, file_cfg),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable settings file")
        }
    }
}

fn apply_env_layer(settings: &mut StoreSettings) {
    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__MAX_CONNECTIONS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.max_connections = parsed;
        }
    }
}

fn apply_file_values(settings: &mut StoreSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.max_connections {
        settings.max_connections = v;
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_sqlite_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return StoreSettings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
