//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Component factory registry
//!
//! This module provides the capability-indexed registry of known receiver,
//! processor, exporter, and extension types. The translator never imports
//! concrete component implementations; it only needs type names to resolve
//! and payloads to pass schema checks.

use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Component kinds known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Receiver,
    Processor,
    Exporter,
    Extension,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Receiver => write!(f, "receiver"),
            ComponentKind::Processor => write!(f, "processor"),
            ComponentKind::Exporter => write!(f, "exporter"),
            ComponentKind::Extension => write!(f, "extension"),
        }
    }
}

/// Factory handle for one component type
///
/// The registry holds one factory per known type name. Factories validate
/// opaque configuration payloads against their component's schema; the
/// component's runtime behavior is owned entirely by the execution engine.
pub trait ComponentFactory: Send + Sync {
    /// Component type name this factory builds
    fn type_name(&self) -> &str;

    /// Validate an opaque payload against the component's schema
    fn validate_payload(&self, payload: &Value) -> ConfigResult<()>;
}

/// Registry of known component factories, indexed by kind and type name
#[derive(Default)]
pub struct FactoryRegistry {
    receivers: HashMap<String, Box<dyn ComponentFactory>>,
    processors: HashMap<String, Box<dyn ComponentFactory>>,
    exporters: HashMap<String, Box<dyn ComponentFactory>>,
    extensions: HashMap<String, Box<dyn ComponentFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a receiver factory
    pub fn register_receiver(&mut self, factory: Box<dyn ComponentFactory>) -> ConfigResult<()> {
        Self::insert(&mut self.receivers, ComponentKind::Receiver, factory)
    }

    /// Register a processor factory
    pub fn register_processor(&mut self, factory: Box<dyn ComponentFactory>) -> ConfigResult<()> {
        Self::insert(&mut self.processors, ComponentKind::Processor, factory)
    }

    /// Register an exporter factory
    pub fn register_exporter(&mut self, factory: Box<dyn ComponentFactory>) -> ConfigResult<()> {
        Self::insert(&mut self.exporters, ComponentKind::Exporter, factory)
    }

    /// Register an extension factory
    pub fn register_extension(&mut self, factory: Box<dyn ComponentFactory>) -> ConfigResult<()> {
        Self::insert(&mut self.extensions, ComponentKind::Extension, factory)
    }

    fn insert(
        map: &mut HashMap<String, Box<dyn ComponentFactory>>,
        kind: ComponentKind,
        factory: Box<dyn ComponentFactory>,
    ) -> ConfigResult<()> {
        let name = factory.type_name().to_string();
        if map.contains_key(&name) {
            return Err(ConfigError::structural(format!(
                "duplicate {} factory {}",
                kind, name
            )));
        }
        map.insert(name, factory);
        Ok(())
    }

    /// Resolve a factory by kind and type name
    pub fn get(&self, kind: ComponentKind, name: &str) -> Option<&dyn ComponentFactory> {
        let map = match kind {
            ComponentKind::Receiver => &self.receivers,
            ComponentKind::Processor => &self.processors,
            ComponentKind::Exporter => &self.exporters,
            ComponentKind::Extension => &self.extensions,
        };
        map.get(name).map(|f| f.as_ref())
    }
}

/// The fixed component set the tracing subsystem supports. Adding support
/// for a new receiver, processor, or exporter means adding it here.
pub fn tracing_factories() -> ConfigResult<FactoryRegistry> {
    let mut registry = FactoryRegistry::new();

    for name in ["jaeger", "zipkin", "otlp", "opencensus"] {
        registry.register_receiver(Box::new(MappingFactory::new(name)))?;
    }

    registry.register_processor(Box::new(MappingFactory::new("batch")))?;
    registry.register_processor(Box::new(MappingFactory::new("attributes")))?;
    registry.register_processor(Box::new(PromSdProcessorFactory))?;

    registry.register_exporter(Box::new(OtlpExporterFactory))?;

    Ok(registry)
}

/// Generic factory accepting any mapping (or absent) payload
pub struct MappingFactory {
    type_name: String,
}

impl MappingFactory {
    /// Create a factory for the given type name
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl ComponentFactory for MappingFactory {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn validate_payload(&self, payload: &Value) -> ConfigResult<()> {
        match payload {
            Value::Null | Value::Object(_) => Ok(()),
            other => Err(ConfigError::structural(format!(
                "{} config must be a mapping, got {}",
                self.type_name,
                json_type_name(other)
            ))),
        }
    }
}

/// Factory for the service-discovery processor
pub struct PromSdProcessorFactory;

/// Type name of the service-discovery processor
pub const PROM_SD_PROCESSOR: &str = "prom_sd_processor";

impl ComponentFactory for PromSdProcessorFactory {
    fn type_name(&self) -> &str {
        PROM_SD_PROCESSOR
    }

    fn validate_payload(&self, payload: &Value) -> ConfigResult<()> {
        let mapping = payload.as_object().ok_or_else(|| {
            ConfigError::structural(format!(
                "{} config must be a mapping, got {}",
                PROM_SD_PROCESSOR,
                json_type_name(payload)
            ))
        })?;

        match mapping.get("scrape_configs") {
            Some(Value::Array(_)) => Ok(()),
            Some(other) => Err(ConfigError::structural(format!(
                "scrape_configs must be a sequence, got {}",
                json_type_name(other)
            ))),
            None => Err(ConfigError::structural(
                "prom_sd_processor config is missing scrape_configs",
            )),
        }
    }
}

/// Factory for the OTLP push exporter
pub struct OtlpExporterFactory;

impl ComponentFactory for OtlpExporterFactory {
    fn type_name(&self) -> &str {
        "otlp"
    }

    fn validate_payload(&self, payload: &Value) -> ConfigResult<()> {
        let mapping = payload.as_object().ok_or_else(|| {
            ConfigError::structural(format!(
                "otlp exporter config must be a mapping, got {}",
                json_type_name(payload)
            ))
        })?;

        match mapping.get("endpoint") {
            Some(Value::String(endpoint)) if !endpoint.is_empty() => {}
            Some(Value::String(_)) | None => {
                return Err(ConfigError::structural(
                    "otlp exporter config is missing an endpoint",
                ))
            }
            Some(other) => {
                return Err(ConfigError::structural(format!(
                    "otlp exporter endpoint must be a string, got {}",
                    json_type_name(other)
                )))
            }
        }

        if let Some(compression) = mapping.get("compression") {
            match compression.as_str() {
                Some("gzip") | Some("") => {}
                _ => {
                    return Err(ConfigError::structural(format!(
                        "unsupported otlp exporter compression {}",
                        compression
                    )))
                }
            }
        }

        if let Some(headers) = mapping.get("headers") {
            let headers = headers.as_object().ok_or_else(|| {
                ConfigError::structural("otlp exporter headers must be a mapping")
            })?;
            for (key, value) in headers {
                if !value.is_string() {
                    return Err(ConfigError::structural(format!(
                        "otlp exporter header {} must be a string",
                        key
                    )));
                }
            }
        }

        for field in ["sending_queue", "retry_on_failure"] {
            if let Some(value) = mapping.get(field) {
                if !value.is_object() && !value.is_null() {
                    return Err(ConfigError::structural(format!(
                        "otlp exporter {} must be a mapping, got {}",
                        field,
                        json_type_name(value)
                    )));
                }
            }
        }

        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
