//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use cam_post::{BuilderConfig, NumberingConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub numbering: NumberingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub post: PostConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where generated files are written (stdout when unset)
    pub directory: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_main_file_name")]
    pub main_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: default_extension(),
            main_file_name: default_main_file_name(),
        }
    }
}

fn default_extension() -> String {
    "nc".to_string()
}

fn default_main_file_name() -> String {
    "main".to_string()
}

/// Behaviour of the standard listeners
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostConfig {
    /// Write the program number as a comment at the start of the file
    #[serde(default = "default_true")]
    pub program_number_comment: bool,
    /// Retract to this Z with a rapid move before every tool change
    pub safe_z: Option<f64>,
    /// Write a comment naming the tool after every tool change
    #[serde(default)]
    pub tool_comments: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            program_number_comment: true,
            safe_z: None,
            tool_comments: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Builder settings derived from this configuration
    pub fn builder_config(&self) -> BuilderConfig {
        BuilderConfig {
            numbering: self.numbering,
            main_file_name: self.output.main_file_name.clone(),
        }
    }

    /// Reject settings that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        if self.numbering.enabled && self.numbering.increment == 0 {
            bail!("numbering.increment must be greater than zero");
        }
        if self.output.main_file_name.trim().is_empty() {
            bail!("output.main_file_name must not be empty");
        }
        if self.output.extension.contains(['/', '\\']) {
            bail!("output.extension must not contain path separators");
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}
