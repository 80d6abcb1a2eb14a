//! Configuration for a metrics run.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! working-directory config file -> explicit config file -> environment -> CLI overrides.

use crate::error::{AgreementError, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "agreement.toml";

/// Settings for one run of the metrics pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementConfig {
    /// Cleaned annotation table to read.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Directory that receives the report.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report file name inside `output_dir`.
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Field delimiter for both input and output tables.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: default_output_dir(),
            output_file: default_output_file(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_file() -> String {
    "metrics.tsv".to_string()
}

fn default_delimiter() -> char {
    '\t'
}

impl AgreementConfig {
    /// Input path, required before the pipeline can run.
    pub fn input_path(&self) -> Result<&Path> {
        self.input
            .as_deref()
            .ok_or_else(|| AgreementError::config("no input table configured"))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

/// Values supplied on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// Load configuration with layered precedence:
/// 1. Explicit overrides (CLI arguments)
/// 2. Environment variables (`AGREEMENT_INPUT`, `AGREEMENT_OUTPUT_DIR`, ...)
/// 3. Explicit config file
/// 4. `agreement.toml` in `workdir`
/// 5. User config (`~/.config/agreement/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workdir: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<AgreementConfig> {
    let mut figment = Figment::from(Serialized::defaults(AgreementConfig::default()));

    // User-level config
    if let Some(dirs) = directories::ProjectDirs::from("org", "agreement", "agreement") {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(dir) = workdir {
        let local = dir.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            figment = figment.merge(Toml::file(&local));
        }
    }

    if let Some(path) = config_file {
        if !path.exists() {
            return Err(AgreementError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("AGREEMENT_"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: AgreementConfig = figment.extract()?;
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}
