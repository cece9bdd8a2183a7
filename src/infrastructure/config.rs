use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::extraction::ExtractionRules;

/// Prefix of environment overrides, e.g. `LINKRECON_OUTPUT__DIR=/tmp/out`.
const ENV_PREFIX: &str = "LINKRECON";
const LOCAL_CONFIG: &str = "linkrecon.toml";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub controller: ControllerConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Row export: `.json` array of rows or `.csv` with canonical headers.
    pub rows: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// JSON object of controller payloads keyed by connection key.
    pub snapshot: String,
    /// Blueprint label, informational only.
    #[serde(default)]
    pub blueprint: Option<String>,
}

/// Per-field replacements for the default extraction paths.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtractionConfig {
    #[serde(flatten)]
    pub paths: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl ExtractionConfig {
    pub fn rules(&self) -> Result<ExtractionRules> {
        ExtractionRules::default()
            .with_overrides(&self.paths)
            .context("Invalid [extraction] section")
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment as the override source when
    /// given.
    fn load_with_env(path: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env);

        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let cfg: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to parse config TOML")?;
        Ok(cfg)
    }

    /// `./linkrecon.toml` if present, else `<config dir>/linkrecon/config.toml`.
    pub fn default_path() -> PathBuf {
        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            return local.to_path_buf();
        }
        dirs::config_dir()
            .map(|d| d.join("linkrecon").join("config.toml"))
            .unwrap_or_else(|| local.to_path_buf())
    }
}
