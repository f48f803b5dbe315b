//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Trace pipeline configuration translation
//!
//! This crate translates a small, user-facing declarative description of
//! trace-collection pipelines into a fully-specified pipeline configuration
//! for a pluggable-component collector engine. Operators write instance
//! configurations (name, receivers, optional processors, one push
//! destination); the translator expands each into component instances,
//! pipeline wiring, and defaulted operational parameters, and validates the
//! result against the registry of known component types.

pub mod config;
pub mod error;
pub mod factories;
pub mod graph;
pub mod loader;
pub mod translate;

// Re-export commonly used types
pub use config::{BasicAuth, Compression, Config, InstanceConfig, PushConfig};
pub use error::{ConfigError, ConfigResult, Stage};
pub use factories::{tracing_factories, ComponentFactory, ComponentKind, FactoryRegistry};
pub use graph::{PipelineGraph, PipelineSpec, OTLP_EXPORTER, TRACES_PIPELINE};
pub use loader::{ComponentConfig, ValidatedConfig};
pub use translate::{otel_config, pipeline_graph};
