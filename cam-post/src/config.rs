//! Builder configuration types
//!
//! The builder only needs to know how to number lines and what to call the
//! main file. Everything else (input files, output paths) belongs to the
//! application layer.

use serde::{Deserialize, Serialize};

/// Configuration for the instruction builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Line numbering settings
    #[serde(default)]
    pub numbering: NumberingConfig,

    /// Name of the main program file
    #[serde(default = "default_main_file_name")]
    pub main_file_name: String,
}

/// `N` word numbering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingConfig {
    /// Whether flushed lines are prefixed with `N<number>`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number given to the first line of every file
    #[serde(default = "default_numbering_step")]
    pub start: u64,

    /// Amount added after every flushed line
    #[serde(default = "default_numbering_step")]
    pub increment: u64,
}

fn default_true() -> bool {
    true
}

fn default_numbering_step() -> u64 {
    10
}

fn default_main_file_name() -> String {
    "main".to_string()
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start: default_numbering_step(),
            increment: default_numbering_step(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            numbering: NumberingConfig::default(),
            main_file_name: default_main_file_name(),
        }
    }
}

impl BuilderConfig {
    /// Create a new builder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable line numbering
    pub fn with_numbering(mut self, enabled: bool) -> Self {
        self.numbering.enabled = enabled;
        self
    }

    /// Builder method: set the first line number
    pub fn with_numbering_start(mut self, start: u64) -> Self {
        self.numbering.start = start;
        self
    }

    /// Builder method: set the line number increment
    pub fn with_numbering_increment(mut self, increment: u64) -> Self {
        self.numbering.increment = increment;
        self
    }

    /// Builder method: set the main file name
    pub fn with_main_file_name(mut self, name: impl Into<String>) -> Self {
        self.main_file_name = name.into();
        self
    }
}
