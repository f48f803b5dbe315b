//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Push (export) configuration for trace pipelines
//!
//! This module provides the configuration describing where and how processed
//! traces are sent, including transport trust, compression, credentials, and
//! delivery durability payloads.

use crate::error::{ConfigError, ConfigResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Wire compression applied by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Gzip,
    None,
}

impl Compression {
    /// Wire form understood by the collector engine. The engine treats an
    /// empty compression string as "no compression".
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::None => "",
        }
    }
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Gzip
    }
}

/// Basic authentication credentials for the export endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicAuth {
    /// Username sent in the authorization header
    pub username: String,

    /// Literal password value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Path to a file whose full contents are used as the password.
    /// Takes precedence over the literal password when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
}

impl BasicAuth {
    /// Resolve the effective password. File contents win over the literal.
    pub fn resolve_password(&self) -> ConfigResult<String> {
        if let Some(path) = &self.password_file {
            let bytes =
                std::fs::read(path).map_err(|e| ConfigError::io(path.clone(), e))?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        Ok(self.password.clone().unwrap_or_default())
    }

    /// Build the value of the `authorization` header for these credentials
    pub fn authorization_header(&self) -> ConfigResult<String> {
        let password = self.resolve_password()?;
        let encoded = STANDARD.encode(format!("{}:{}", self.username, password));
        Ok(format!("Basic {}", encoded))
    }
}

/// Push configuration controlling export to the remote collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Destination address traces are pushed to
    pub endpoint: String,

    /// Wire compression, defaults to gzip
    pub compression: Compression,

    /// Allow plaintext transport
    pub insecure: bool,

    /// Skip TLS certificate verification
    pub insecure_skip_verify: bool,

    /// Basic authentication credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    /// Opaque batch processor payload; presence enables batching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<Value>,

    /// Opaque sending queue payload, passed through to the exporter verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sending_queue: Option<Value>,

    /// Opaque retry payload. `max_elapsed_time` is defaulted to 60s by the
    /// translator when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_failure: Option<Map<String, Value>>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            compression: Compression::default(),
            insecure: false,
            insecure_skip_verify: false,
            basic_auth: None,
            batch: None,
            sending_queue: None,
            retry_on_failure: None,
        }
    }
}
