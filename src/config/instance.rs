//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Instance configuration and set-level validation
//!
//! This module provides the top-level configuration set and the per-pipeline
//! instance configuration operators write.

use crate::config::push::PushConfig;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Top-level configuration set controlling trace pipelines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline instance configurations
    #[serde(default)]
    pub configs: Vec<InstanceConfig>,
}

impl Config {
    /// Load and validate a configuration set from a YAML string
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::structural_with_source("failed to parse configuration", e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration set from a YAML file
    pub fn from_yaml_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.to_path_buf(), e))?;
        Self::from_yaml_str(&content)
    }

    /// Validate the configuration set. Every instance name must be non-empty
    /// and pairwise distinct; the first violation encountered is reported.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::with_capacity(self.configs.len());
        for (idx, instance) in self.configs.iter().enumerate() {
            if instance.name.is_empty() {
                return Err(ConfigError::structural(format!(
                    "config at index {} is missing a name",
                    idx
                )));
            }
            if !names.insert(instance.name.as_str()) {
                return Err(ConfigError::structural(format!(
                    "found multiple configs with name {}",
                    instance.name
                )));
            }
        }

        Ok(())
    }

    /// Get the instance configuration with the given name
    pub fn get_instance(&self, name: &str) -> Option<&InstanceConfig> {
        self.configs.iter().find(|c| c.name == name)
    }
}

/// Configuration for an individual trace pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Instance name, unique within the configuration set
    #[serde(default)]
    pub name: String,

    /// Export destination for this pipeline
    pub push_config: PushConfig,

    /// Receiver type name to opaque receiver payload
    #[serde(default)]
    pub receivers: Map<String, Value>,

    /// Opaque payload for the attribute-mutation processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,

    /// Service-discovery target specifications; presence enables the
    /// discovery processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_configs: Option<Vec<Value>>,
}
