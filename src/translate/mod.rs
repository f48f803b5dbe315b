//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline translator
//!
//! This module expands one validated instance configuration into the
//! fully-qualified pipeline graph consumed by the loader: a single OTLP
//! exporter with defaulted retry and credential policy, conditionally
//! included processors, pass-through receivers, and the traces pipeline
//! wiring them together.

use crate::config::{InstanceConfig, PushConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::factories::{FactoryRegistry, PROM_SD_PROCESSOR};
use crate::graph::{PipelineGraph, PipelineSpec, ServiceGraph, OTLP_EXPORTER, TRACES_PIPELINE};
use crate::loader::{self, ValidatedConfig};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Type name of the attribute-mutation processor
pub const ATTRIBUTES_PROCESSOR: &str = "attributes";

/// Type name of the batch processor
pub const BATCH_PROCESSOR: &str = "batch";

/// Retry window applied when the instance does not set one. The engine's
/// own default of 300s keeps delivery failures out of the logs too long.
const DEFAULT_MAX_ELAPSED_TIME: &str = "60s";

/// Translate one instance into a validated engine configuration
pub fn otel_config(
    instance: &InstanceConfig,
    registry: &FactoryRegistry,
) -> ConfigResult<ValidatedConfig> {
    let graph = pipeline_graph(instance)?;
    loader::load(&graph, registry)
}

/// Expand one instance configuration into a pipeline graph
pub fn pipeline_graph(instance: &InstanceConfig) -> ConfigResult<PipelineGraph> {
    if instance.receivers.is_empty() {
        return Err(ConfigError::structural(format!(
            "instance {}: must have at least one configured receiver",
            instance.name
        )));
    }

    if instance.push_config.endpoint.is_empty() {
        return Err(ConfigError::structural(format!(
            "instance {}: must have a configured push_config.endpoint",
            instance.name
        )));
    }

    let mut exporters = Map::new();
    exporters.insert(
        OTLP_EXPORTER.to_string(),
        Value::Object(otlp_exporter(&instance.push_config)?),
    );

    let (processors, processor_names) = processors(instance);

    let receivers = instance.receivers.clone();
    let mut receiver_names: Vec<String> = receivers.keys().cloned().collect();
    receiver_names.sort();

    let mut pipelines = HashMap::new();
    pipelines.insert(
        TRACES_PIPELINE.to_string(),
        PipelineSpec {
            exporters: vec![OTLP_EXPORTER.to_string()],
            processors: processor_names,
            receivers: receiver_names,
        },
    );

    debug!(
        instance = %instance.name,
        receivers = receivers.len(),
        processors = processors.len(),
        "assembled pipeline graph"
    );

    Ok(PipelineGraph {
        exporters,
        processors,
        receivers,
        service: ServiceGraph { pipelines },
    })
}

/// Build the OTLP exporter configuration from the push config
fn otlp_exporter(push: &PushConfig) -> ConfigResult<Map<String, Value>> {
    let mut headers = Map::new();
    if let Some(auth) = &push.basic_auth {
        headers.insert(
            "authorization".to_string(),
            Value::String(auth.authorization_header()?),
        );
    }

    let mut exporter = Map::new();
    exporter.insert(
        "endpoint".to_string(),
        Value::String(push.endpoint.clone()),
    );
    exporter.insert(
        "compression".to_string(),
        Value::String(push.compression.as_wire_str().to_string()),
    );
    exporter.insert("headers".to_string(), Value::Object(headers));
    exporter.insert("insecure".to_string(), Value::Bool(push.insecure));
    exporter.insert(
        "insecure_skip_verify".to_string(),
        Value::Bool(push.insecure_skip_verify),
    );
    if let Some(queue) = &push.sending_queue {
        exporter.insert("sending_queue".to_string(), queue.clone());
    }
    exporter.insert(
        "retry_on_failure".to_string(),
        Value::Object(retry_with_defaults(push.retry_on_failure.as_ref())),
    );

    Ok(exporter)
}

/// Apply the retry defaulting policy: synthesize the block when absent,
/// inject `max_elapsed_time` when unset, leave a set value untouched
fn retry_with_defaults(retry: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut retry = retry.cloned().unwrap_or_default();
    retry
        .entry("max_elapsed_time")
        .or_insert_with(|| Value::String(DEFAULT_MAX_ELAPSED_TIME.to_string()));
    retry
}

/// Build the processor configurations and the ordered processor name list.
/// Relative order is fixed: discovery, attributes, batch.
fn processors(instance: &InstanceConfig) -> (Map<String, Value>, Vec<String>) {
    let mut processors = Map::new();
    let mut names = Vec::new();

    if let Some(scrape_configs) = &instance.scrape_configs {
        let mut payload = Map::new();
        payload.insert(
            "scrape_configs".to_string(),
            Value::Array(scrape_configs.clone()),
        );
        processors.insert(PROM_SD_PROCESSOR.to_string(), Value::Object(payload));
        names.push(PROM_SD_PROCESSOR.to_string());
    }

    if let Some(attributes) = &instance.attributes {
        processors.insert(ATTRIBUTES_PROCESSOR.to_string(), attributes.clone());
        names.push(ATTRIBUTES_PROCESSOR.to_string());
    }

    if let Some(batch) = &instance.push_config.batch {
        processors.insert(BATCH_PROCESSOR.to_string(), batch.clone());
        names.push(BATCH_PROCESSOR.to_string());
    }

    (processors, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BasicAuth, Compression};
    use serde_json::json;

    fn minimal_instance() -> InstanceConfig {
        let mut receivers = Map::new();
        receivers.insert("jaeger".to_string(), json!({}));

        InstanceConfig {
            name: "a".to_string(),
            push_config: PushConfig {
                endpoint: "collector:4317".to_string(),
                ..PushConfig::default()
            },
            receivers,
            attributes: None,
            scrape_configs: None,
        }
    }

    fn exporter_config(graph: &PipelineGraph) -> &Map<String, Value> {
        graph.exporters[OTLP_EXPORTER].as_object().unwrap()
    }

    #[test]
    fn test_no_receiver_fails() {
        let mut instance = minimal_instance();
        instance.receivers.clear();

        let err = pipeline_graph(&instance).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("configured receiver"));
    }

    #[test]
    fn test_no_endpoint_fails() {
        let mut instance = minimal_instance();
        instance.push_config.endpoint.clear();

        let err = pipeline_graph(&instance).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("push_config.endpoint"));
    }

    #[test]
    fn test_minimal_instance_graph() {
        let graph = pipeline_graph(&minimal_instance()).unwrap();
        let exporter = exporter_config(&graph);

        assert_eq!(exporter["endpoint"], json!("collector:4317"));
        assert_eq!(exporter["compression"], json!("gzip"));
        assert_eq!(exporter["headers"], json!({}));
        assert_eq!(exporter["insecure"], json!(false));
        assert_eq!(
            exporter["retry_on_failure"],
            json!({"max_elapsed_time": "60s"})
        );
        assert!(!exporter.contains_key("sending_queue"));

        assert!(graph.processors.is_empty());
        let pipeline = graph.traces_pipeline().unwrap();
        assert_eq!(pipeline.exporters, vec!["otlp"]);
        assert!(pipeline.processors.is_empty());
        assert_eq!(pipeline.receivers, vec!["jaeger"]);
    }

    #[test]
    fn test_translation_is_idempotent() {
        let instance = minimal_instance();
        let first = pipeline_graph(&instance).unwrap();
        let second = pipeline_graph(&instance).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compression_none_becomes_empty() {
        let mut instance = minimal_instance();
        instance.push_config.compression = Compression::None;

        let graph = pipeline_graph(&instance).unwrap();
        assert_eq!(exporter_config(&graph)["compression"], json!(""));
    }

    #[test]
    fn test_retry_field_injected_when_unset() {
        let mut instance = minimal_instance();
        let mut retry = Map::new();
        retry.insert("foo".to_string(), json!("bar"));
        instance.push_config.retry_on_failure = Some(retry);

        let graph = pipeline_graph(&instance).unwrap();
        assert_eq!(
            exporter_config(&graph)["retry_on_failure"],
            json!({"foo": "bar", "max_elapsed_time": "60s"})
        );
    }

    #[test]
    fn test_retry_field_preserved_when_set() {
        let mut instance = minimal_instance();
        let mut retry = Map::new();
        retry.insert("max_elapsed_time".to_string(), json!("10s"));
        instance.push_config.retry_on_failure = Some(retry);

        let graph = pipeline_graph(&instance).unwrap();
        assert_eq!(
            exporter_config(&graph)["retry_on_failure"],
            json!({"max_elapsed_time": "10s"})
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let mut instance = minimal_instance();
        instance.push_config.basic_auth = Some(BasicAuth {
            username: "u".to_string(),
            password: Some("p".to_string()),
            password_file: None,
        });

        let graph = pipeline_graph(&instance).unwrap();
        // base64("u:p") == "dTpw"
        assert_eq!(
            exporter_config(&graph)["headers"],
            json!({"authorization": "Basic dTpw"})
        );
    }

    #[test]
    fn test_sending_queue_passes_through() {
        let mut instance = minimal_instance();
        instance.push_config.sending_queue = Some(json!({"queue_size": 100}));

        let graph = pipeline_graph(&instance).unwrap();
        assert_eq!(
            exporter_config(&graph)["sending_queue"],
            json!({"queue_size": 100})
        );
    }

    #[test]
    fn test_processor_relative_order() {
        let mut instance = minimal_instance();
        instance.scrape_configs = Some(vec![json!({"job_name": "default"})]);
        instance.attributes = Some(json!({"actions": []}));
        instance.push_config.batch = Some(json!({"timeout": "5s"}));

        let graph = pipeline_graph(&instance).unwrap();
        let pipeline = graph.traces_pipeline().unwrap();
        assert_eq!(
            pipeline.processors,
            vec![PROM_SD_PROCESSOR, ATTRIBUTES_PROCESSOR, BATCH_PROCESSOR]
        );

        assert_eq!(
            graph.processors[PROM_SD_PROCESSOR],
            json!({"scrape_configs": [{"job_name": "default"}]})
        );
        assert_eq!(graph.processors[ATTRIBUTES_PROCESSOR], json!({"actions": []}));
        assert_eq!(graph.processors[BATCH_PROCESSOR], json!({"timeout": "5s"}));
    }

    #[test]
    fn test_receiver_names_are_sorted() {
        let mut instance = minimal_instance();
        instance.receivers.insert("zipkin".to_string(), json!({}));
        instance.receivers.insert("otlp".to_string(), json!({}));

        let graph = pipeline_graph(&instance).unwrap();
        let pipeline = graph.traces_pipeline().unwrap();
        assert_eq!(pipeline.receivers, vec!["jaeger", "otlp", "zipkin"]);
    }
}
