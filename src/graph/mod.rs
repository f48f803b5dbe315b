//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Fully-qualified pipeline graph produced by the translator
//!
//! This module provides the transient value object handed to the loader:
//! component instances keyed by type name plus the service pipeline wiring.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Component type name of the single exporter every pipeline pushes through
pub const OTLP_EXPORTER: &str = "otlp";

/// Name of the traces pipeline assembled for every instance
pub const TRACES_PIPELINE: &str = "traces";

/// Assembled pipeline graph for one instance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineGraph {
    /// Exporter type name to exporter configuration
    pub exporters: Map<String, Value>,

    /// Processor type name to processor configuration
    pub processors: Map<String, Value>,

    /// Receiver type name to receiver configuration
    pub receivers: Map<String, Value>,

    /// Service pipeline wiring
    pub service: ServiceGraph,
}

impl PipelineGraph {
    /// Get the traces pipeline wiring
    pub fn traces_pipeline(&self) -> Option<&PipelineSpec> {
        self.service.pipelines.get(TRACES_PIPELINE)
    }
}

/// Service section of the pipeline graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceGraph {
    /// Named pipelines wiring receivers, processors, and exporters together
    pub pipelines: HashMap<String, PipelineSpec>,
}

/// One named pipeline referencing component instances by type name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Exporter references
    pub exporters: Vec<String>,

    /// Processor references, in execution order
    pub processors: Vec<String>,

    /// Receiver references
    pub receivers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traces_pipeline_lookup() {
        let spec = PipelineSpec {
            exporters: vec![OTLP_EXPORTER.to_string()],
            processors: vec![],
            receivers: vec!["jaeger".to_string()],
        };

        let mut pipelines = HashMap::new();
        pipelines.insert(TRACES_PIPELINE.to_string(), spec.clone());

        let graph = PipelineGraph {
            exporters: Map::new(),
            processors: Map::new(),
            receivers: Map::new(),
            service: ServiceGraph { pipelines },
        };

        assert_eq!(graph.traces_pipeline(), Some(&spec));
    }
}
