// Configuration loader
// Layers: defaults -> TOML file -> environment -> CLI overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Config;
use crate::errors::config_parse_error;

/// Values given on the command line; they win over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load configuration using the process environment
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    load_config_from(overrides, |key| std::env::var(key).ok())
}

/// Load configuration reading variables through `env`
pub fn load_config_from<F>(overrides: &ConfigOverrides, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let path = overrides
        .config_path
        .clone()
        .or_else(|| env("OAKBOT_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => read_config_file(&path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read_config_file(&path)?,
            None => Config::default(),
        },
    };

    apply_env(&mut config, &env)?;

    if let Some(host) = &overrides.host {
        config.server.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".oakbot").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config =
        toml::from_str(&contents).map_err(|e| anyhow::anyhow!(config_parse_error(path, &e)))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

fn apply_env<F>(config: &mut Config, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
        config.provider.api_key = Some(key);
    }
    if let Some(model) = env("OAKBOT_MODEL") {
        config.provider.model = model;
    }
    if let Some(base_url) = env("OAKBOT_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Some(port) = env("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
    }
    Ok(())
}
