use super::smart_load;
use crate::parallel::{clamp_concurrency, default_concurrency};
use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Settings files picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["config-migrator.toml", "config-migrator.json"];

/// Prefix of environment overrides, e.g. `CONFIG_MIGRATOR_CONCURRENCY=4`
pub const ENV_PREFIX: &str = "CONFIG_MIGRATOR_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Glob patterns matched against base file names
    pub patterns: Vec<String>,
    /// Queue capacity and worker count per stage, at least 1
    #[serde(deserialize_with = "deserialize_concurrency")]
    pub concurrency: usize,
    /// Custom rule mapping (JSON array of pairs)
    pub mapping: Option<PathBuf>,
    /// Cancel the remaining targets after the first failure
    pub fail_fast: bool,
    pub follow_symlinks: bool,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["*.json".to_string(), "*.tmpl".to_string()],
            concurrency: default_concurrency(),
            mapping: None,
            fail_fast: false,
            follow_symlinks: false,
        }
    }
}

impl MigratorConfig {
    /// Merge, lowest priority first: defaults, settings file, environment,
    /// CLI overrides. A custom settings file must exist.
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        figment = match custom_config {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Settings file not found: {}", path.display());
                }
                figment.merge(smart_load::auto(path))
            }
            None => figment
                .merge(Toml::file(DEFAULT_CONFIG_FILES[0]))
                .merge(Json::file(DEFAULT_CONFIG_FILES[1])),
        };

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        if let Some(cli) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(cli));
        }

        figment.extract().context("Invalid migrator configuration")
    }
}

/// Any integer is accepted; zero and negative levels mean a single worker
fn deserialize_concurrency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    i64::deserialize(deserializer).map(clamp_concurrency)
}
