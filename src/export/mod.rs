//! Export functionality for dependency analysis results.
//!
//! This module provides exporters for outputting dependency graph
//! reports in various formats: JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::graph::{
    CycleInfo, DependencyGraph, GraphError, GraphResult, GraphStatistics, ModuleSummary,
};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    #[default]
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Detailed relations of a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInspection {
    /// Inspected module
    pub module: String,
    /// Direct dependencies, in insertion order
    pub direct_dependencies: Vec<String>,
    /// Every module reachable through dependencies
    pub transitive_dependencies: Vec<String>,
    /// Modules depending directly on this one
    pub dependents: Vec<String>,
    /// Modules transitively affected by a change to this one
    pub impact: Vec<String>,
}

/// Data container for export operations.
///
/// Holds all the analysis results that can be exported.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Project name
    pub project_name: String,
    /// Every module with its direct relations, sorted by name
    pub modules: Vec<ModuleSummary>,
    /// Summary counters
    pub statistics: GraphStatistics,
    /// Modules with no dependencies
    pub independent: Vec<String>,
    /// Build order, absent while the graph has cycles
    pub build_order: Option<Vec<String>>,
    /// Detected circular dependencies
    pub cycles: Vec<CycleInfo>,
    /// Every module taking part in some cycle, sorted by name
    pub cyclic_modules: Vec<String>,
    /// Per-module details requested by the caller
    pub inspections: Vec<ModuleInspection>,
}

impl ExportData {
    /// Create new export data from analysis results.
    pub fn new(project_name: impl Into<String>, graph: &DependencyGraph) -> Self {
        let (build_order, cycles) = match graph.topological_order() {
            Ok(order) => (Some(order), Vec::new()),
            Err(GraphError::CyclePresent { cycles }) => (None, cycles),
            Err(_) => (None, graph.detect_cycles().cycles),
        };

        let mut cyclic_modules: Vec<String> = graph.modules_in_cycles().into_iter().collect();
        cyclic_modules.sort();

        Self {
            project_name: project_name.into(),
            modules: graph.module_summaries(),
            statistics: graph.statistics(),
            independent: graph
                .independent_modules()
                .into_iter()
                .map(String::from)
                .collect(),
            build_order,
            cycles,
            cyclic_modules,
            inspections: Vec::new(),
        }
    }

    /// Adds the detailed relations of `name` to the report.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if the module is not registered.
    pub fn inspect(&mut self, graph: &DependencyGraph, name: &str) -> GraphResult<()> {
        if !graph.contains(name) {
            return Err(GraphError::NotFound(name.to_string()));
        }

        self.inspections.push(ModuleInspection {
            module: name.to_string(),
            direct_dependencies: graph.direct_dependencies(name).to_vec(),
            transitive_dependencies: graph.transitive_dependencies(name).into_iter().collect(),
            dependents: graph
                .dependents(name)
                .into_iter()
                .map(String::from)
                .collect(),
            impact: graph.impact_analysis(name).into_iter().collect(),
        });
        Ok(())
    }

    /// Returns true if the module takes part in a cycle.
    pub fn is_cyclic(&self, name: &str) -> bool {
        self.cyclic_modules.iter().any(|m| m == name)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
