//! Runtime tuning for the installed service
//!
//! Rendered into the environment file sourced by the init scripts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtime section of svcdeb.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Memory ceiling handed to the service manager (e.g. "256M")
    #[serde(default = "default_memory_limit")]
    pub memory_limit: String,

    /// Open file descriptor limit
    #[serde(default = "default_open_files")]
    pub open_files: u64,

    /// Scheduling niceness
    #[serde(default)]
    pub nice: i8,

    /// Extra arguments passed to the service after its config path
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_memory_limit() -> String {
    "256M".to_string()
}

fn default_open_files() -> u64 {
    65536
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            memory_limit: default_memory_limit(),
            open_files: default_open_files(),
            nice: 0,
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }
}
