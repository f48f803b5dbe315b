//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Configuration loader
//!
//! This module merges an assembled pipeline graph into a structural mapping
//! and loads it against the factory registry, producing a typed, validated
//! configuration or a schema error tagged with the failing stage.

use crate::error::{ConfigError, ConfigResult, Stage};
use crate::factories::{ComponentKind, FactoryRegistry};
use crate::graph::{PipelineGraph, PipelineSpec};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Configuration for one resolved component instance
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
    /// Component kind
    pub kind: ComponentKind,

    /// Component type name, resolved against the registry
    pub type_name: String,

    /// Schema-checked configuration payload
    pub config: Value,
}

/// Fully typed, validated configuration ready for the execution engine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedConfig {
    /// Resolved receiver configurations by type name
    pub receivers: HashMap<String, ComponentConfig>,

    /// Resolved processor configurations by type name
    pub processors: HashMap<String, ComponentConfig>,

    /// Resolved exporter configurations by type name
    pub exporters: HashMap<String, ComponentConfig>,

    /// Validated pipeline wiring by pipeline name
    pub pipelines: HashMap<String, PipelineSpec>,
}

impl ValidatedConfig {
    /// Get the wiring for a named pipeline
    pub fn pipeline(&self, name: &str) -> Option<&PipelineSpec> {
        self.pipelines.get(name)
    }
}

/// Merge the pipeline graph and load it against the registry
pub fn load(graph: &PipelineGraph, registry: &FactoryRegistry) -> ConfigResult<ValidatedConfig> {
    let merged = merge(graph)?;
    load_merged(&merged, registry)
}

/// Flatten the pipeline graph into one structural mapping
fn merge(graph: &PipelineGraph) -> ConfigResult<Map<String, Value>> {
    let value = serde_json::to_value(graph).map_err(|e| {
        ConfigError::schema_with_source(Stage::Merge, "pipeline graph is not serializable", e)
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::schema(
            Stage::Merge,
            format!("pipeline graph must merge to a mapping, got {}", other),
        )),
    }
}

/// Load a merged structural mapping against the factory registry
fn load_merged(
    merged: &Map<String, Value>,
    registry: &FactoryRegistry,
) -> ConfigResult<ValidatedConfig> {
    let mut config = ValidatedConfig {
        receivers: load_components(merged, registry, ComponentKind::Receiver, "receivers")?,
        processors: load_components(merged, registry, ComponentKind::Processor, "processors")?,
        exporters: load_components(merged, registry, ComponentKind::Exporter, "exporters")?,
        pipelines: HashMap::new(),
    };
    config.pipelines = load_pipelines(merged, &config)?;

    debug!(
        receivers = config.receivers.len(),
        processors = config.processors.len(),
        exporters = config.exporters.len(),
        pipelines = config.pipelines.len(),
        "loaded configuration"
    );

    Ok(config)
}

fn load_components(
    merged: &Map<String, Value>,
    registry: &FactoryRegistry,
    kind: ComponentKind,
    section_name: &str,
) -> ConfigResult<HashMap<String, ComponentConfig>> {
    let section = section(merged, section_name)?;

    let mut components = HashMap::with_capacity(section.len());
    for (type_name, payload) in section {
        let factory = registry.get(kind, type_name).ok_or_else(|| {
            ConfigError::schema(Stage::Load, format!("unknown {} type {}", kind, type_name))
        })?;

        factory.validate_payload(payload).map_err(|e| {
            ConfigError::schema_with_source(
                Stage::Load,
                format!("invalid {} config for {}", kind, type_name),
                e,
            )
        })?;

        components.insert(
            type_name.clone(),
            ComponentConfig {
                kind,
                type_name: type_name.clone(),
                config: payload.clone(),
            },
        );
    }

    Ok(components)
}

fn load_pipelines(
    merged: &Map<String, Value>,
    config: &ValidatedConfig,
) -> ConfigResult<HashMap<String, PipelineSpec>> {
    let service = section(merged, "service")?;
    let pipelines = match service.get("pipelines") {
        Some(Value::Object(pipelines)) => pipelines,
        _ => {
            return Err(ConfigError::schema(
                Stage::Load,
                "service section is missing a pipelines mapping",
            ))
        }
    };

    let mut loaded = HashMap::with_capacity(pipelines.len());
    for (name, spec) in pipelines {
        let spec: PipelineSpec = serde_json::from_value(spec.clone()).map_err(|e| {
            ConfigError::schema_with_source(
                Stage::Load,
                format!("pipeline {} is malformed", name),
                e,
            )
        })?;

        check_references(name, "receiver", &spec.receivers, &config.receivers)?;
        check_references(name, "processor", &spec.processors, &config.processors)?;
        check_references(name, "exporter", &spec.exporters, &config.exporters)?;

        loaded.insert(name.clone(), spec);
    }

    Ok(loaded)
}

fn check_references(
    pipeline: &str,
    kind: &str,
    references: &[String],
    declared: &HashMap<String, ComponentConfig>,
) -> ConfigResult<()> {
    for reference in references {
        if !declared.contains_key(reference) {
            return Err(ConfigError::schema(
                Stage::Load,
                format!(
                    "pipeline {} references undeclared {} {}",
                    pipeline, kind, reference
                ),
            ));
        }
    }
    Ok(())
}

fn section<'a>(
    merged: &'a Map<String, Value>,
    name: &str,
) -> ConfigResult<&'a Map<String, Value>> {
    match merged.get(name) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ConfigError::schema(
            Stage::Load,
            format!("{} section must be a mapping", name),
        )),
        None => Err(ConfigError::schema(
            Stage::Load,
            format!("configuration is missing the {} section", name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::tracing_factories;
    use crate::graph::{ServiceGraph, OTLP_EXPORTER, TRACES_PIPELINE};
    use serde_json::json;

    fn graph_with(receiver: &str) -> PipelineGraph {
        let mut exporters = Map::new();
        exporters.insert(
            OTLP_EXPORTER.to_string(),
            json!({"endpoint": "collector:4317"}),
        );

        let mut receivers = Map::new();
        receivers.insert(receiver.to_string(), json!({}));

        let mut pipelines = HashMap::new();
        pipelines.insert(
            TRACES_PIPELINE.to_string(),
            PipelineSpec {
                exporters: vec![OTLP_EXPORTER.to_string()],
                processors: vec![],
                receivers: vec![receiver.to_string()],
            },
        );

        PipelineGraph {
            exporters,
            processors: Map::new(),
            receivers,
            service: ServiceGraph { pipelines },
        }
    }

    #[test]
    fn test_load_known_components() {
        let registry = tracing_factories().unwrap();
        let config = load(&graph_with("jaeger"), &registry).unwrap();

        assert_eq!(config.receivers.len(), 1);
        assert_eq!(config.exporters.len(), 1);
        assert!(config.pipeline(TRACES_PIPELINE).is_some());
    }

    #[test]
    fn test_unknown_receiver_type_fails_at_load_stage() {
        let registry = tracing_factories().unwrap();
        let err = load(&graph_with("kafka"), &registry).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Load));
        assert!(err.to_string().contains("failed to load configuration"));
    }

    #[test]
    fn test_undeclared_pipeline_reference_fails() {
        let registry = tracing_factories().unwrap();
        let mut graph = graph_with("jaeger");
        graph
            .service
            .pipelines
            .get_mut(TRACES_PIPELINE)
            .unwrap()
            .processors
            .push("batch".to_string());

        let err = load(&graph, &registry).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Load));
        assert!(err.to_string().contains("undeclared"));
    }

    #[test]
    fn test_malformed_exporter_payload_fails() {
        let registry = tracing_factories().unwrap();
        let mut graph = graph_with("jaeger");
        graph
            .exporters
            .insert(OTLP_EXPORTER.to_string(), json!({"endpoint": ""}));

        let err = load(&graph, &registry).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Load));
    }
}
