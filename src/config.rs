//! Declarative logging configuration
//!
//! The facade consumes a hierarchical key/value document: an ordered
//! `handlers` list naming the blocks to build, a `rev` release id for the
//! remote sink, and one named block per handler. Blocks are read-only after
//! construction.

use crate::core::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

fn default_max_mbs() -> u64 {
    20
}

fn default_max_days() -> u64 {
    30
}

fn default_max_backups() -> usize {
    10
}

/// One named handler block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct HandlerConfig {
    /// Handler kind: `text`, `json`, or `sentry`
    pub handler: String,
    /// Output kind: `file` writes through the rotating writer; `stdout` or
    /// anything unrecognized resolves to standard output
    pub output: String,
    /// Path for `output: file`
    pub filename: String,
    /// Rotation threshold in megabytes
    pub max_mbs: u64,
    /// Prune rotated segments older than this many days
    pub max_days: u64,
    /// Maximum rotated segments kept on disk
    pub max_backups: usize,
    /// Severity floor; unrecognized or empty means `info`
    pub level: String,
    /// Remote sink endpoint (sentry blocks only)
    pub dsn: String,
    /// Remote sink environment label
    pub env: String,
    /// Remote transport diagnostics on stderr
    pub debug: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            handler: String::new(),
            output: String::new(),
            filename: String::new(),
            max_mbs: default_max_mbs(),
            max_days: default_max_days(),
            max_backups: default_max_backups(),
            level: String::new(),
            dsn: String::new(),
            env: String::new(),
            debug: false,
        }
    }
}

/// The full logging configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered list of block names to build
    pub handlers: Vec<String>,
    /// Release id handed to the remote sink
    pub rev: String,
    /// Named handler blocks
    #[serde(flatten)]
    pub blocks: HashMap<String, HandlerConfig>,
}

impl Config {
    /// Parse a YAML configuration document.
    pub fn from_yaml(doc: &str) -> Result<Self> {
        serde_yaml::from_str(doc).map_err(|e| Error::missing_configuration(e.to_string()))
    }

    pub fn block(&self, name: &str) -> Option<&HandlerConfig> {
        self.blocks.get(name)
    }
}
