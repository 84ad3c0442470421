use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::Publication;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// Publication type names offered by `GET /types`, in order.
    pub types: Vec<String>,
    /// Optional JSON array of publications loaded at startup.
    pub seed_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            types: vec!["scientific".into(), "thesis".into()],
            seed_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    types: Option<Vec<String>>,
    seed_file: Option<PathBuf>,
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string("server.toml").ok();
    settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers defaults, then `server.toml`, then `APP__*` environment variables.
pub fn settings_from(raw_toml: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_toml {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.bind_addr = v;
                }
                if let Some(v) = file_cfg.types {
                    settings.types = v;
                }
                if let Some(v) = file_cfg.seed_file {
                    settings.seed_file = Some(v);
                }
            }
            Err(error) => warn!(%error, "ignoring unreadable server.toml"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = env("APP__TYPES") {
        settings.types = v
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(v) = env("APP__SEED_FILE") {
        settings.seed_file = Some(PathBuf::from(v));
    }

    settings
}

pub fn read_seed_file(path: &Path) -> anyhow::Result<Vec<Publication>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| {
        format!("seed file '{}' is not a JSON array of publications", path.display())
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
