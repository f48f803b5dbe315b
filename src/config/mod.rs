//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User-facing configuration model for trace pipelines
//!
//! This module provides the simplified configuration structures operators
//! write, along with set-level validation and YAML loading.

pub mod instance;
pub mod push;

// Re-export commonly used types
pub use instance::{Config, InstanceConfig};
pub use push::{BasicAuth, Compression, PushConfig};
