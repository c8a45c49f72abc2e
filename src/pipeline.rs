//! Schema-driven graph build: bindings, individuals, sources, export

use crate::export::{self, ExportConfig, ExportError};
use crate::graph::Graph;
use crate::mapping::ObjectMapper;
use crate::namespace::Urifier;
use crate::schema::{merge, Schema, SchemaError};
use crate::source::Sourcer;
use crate::template::DataContext;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from a full pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// What a build or run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Distinct triples in the graph
    pub triples: usize,
    /// Individuals whose guard passed
    pub individuals: usize,
    /// Records mapped, counted once per object schema
    pub records: usize,
    /// Sources that could not be read
    pub failed_sources: usize,
    /// Export files written
    pub written: Vec<PathBuf>,
}

/// Runs one schema end to end
#[derive(Debug, Clone)]
pub struct Pipeline {
    schema: Schema,
    sourcer: Sourcer,
    max_depth: Option<usize>,
}

impl Pipeline {
    pub fn new(schema: Schema) -> Self {
        let sourcer = Sourcer::new(schema.base_dir());
        Self {
            schema,
            sourcer,
            max_depth: None,
        }
    }

    /// Load and validate a schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let schema = Schema::load(path)?;
        schema.validate()?;
        Ok(Self::new(schema))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Map individuals and source records into a fresh graph.
    pub fn build_graph(&self) -> (Graph, RunReport) {
        let mut graph = Graph::with_bindings(self.schema.namespace.as_deref(), &self.schema.prefixes);
        let urifier = Urifier::new(graph.namespaces(), self.schema.namespace.as_deref());
        let mut mapper = ObjectMapper::from_schema(&self.schema, urifier);
        if let Some(max_depth) = self.max_depth {
            mapper = mapper.with_max_depth(max_depth);
        }

        let mut report = RunReport::default();

        info!(count = self.schema.individuals.len(), "mapping individuals");
        let empty = DataContext::empty();
        for (uri, individual) in &self.schema.individuals {
            if !individual.is_object() {
                warn!(individual = %uri, "individual is not a mapping, skipped");
                continue;
            }
            let object = merge(&json!({ "uri": uri }), individual);
            if mapper.add_object(&object, &empty, &mut graph).is_some() {
                report.individuals += 1;
            }
        }

        for spec in self.schema.source_specs() {
            if spec.objects.is_empty() {
                continue;
            }
            let name = spec.source.source.as_deref().unwrap_or_default();
            info!(source = name, "mapping source");

            let Some(records) = self.sourcer.get_data(&spec.source) else {
                report.failed_sources += 1;
                continue;
            };

            for object in &spec.objects {
                for (index, record) in records.iter().enumerate() {
                    let ctx = DataContext::new(Value::Object(record.clone())).with_index(index);
                    mapper.add_object(object, &ctx, &mut graph);
                    report.records += 1;
                }
            }
            debug!(source = name, records = records.len(), "source mapped");
        }

        report.triples = graph.len();
        info!(triples = report.triples, "graph built");
        (graph, report)
    }

    /// Build the graph and write the schema's export files.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        self.run_with(&self.schema.export)
    }

    /// Build the graph and write it as described by `export`.
    pub fn run_with(&self, export: &ExportConfig) -> Result<RunReport, PipelineError> {
        export.formats()?;
        let (graph, mut report) = self.build_graph();
        report.written = export::save(&graph, export, self.schema.base_dir())?;
        Ok(report)
    }
}
