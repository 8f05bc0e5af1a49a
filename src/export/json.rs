//! JSON export implementation.
//!
//! Exports dependency analysis results in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::graph::GraphStatistics;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable module for JSON output.
#[derive(Serialize)]
struct JsonModule<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    depends_on: &'a [String],
    required_by: &'a [String],
    in_cycle: bool,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle<'a> {
    modules: &'a [String],
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    statistics: GraphStatistics,
    average_dependencies: f64,
}

/// Serializable module inspection for JSON output.
#[derive(Serialize)]
struct JsonInspection<'a> {
    module: &'a str,
    direct_dependencies: &'a [String],
    transitive_dependencies: &'a [String],
    dependents: &'a [String],
    impact: &'a [String],
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: &'a str,
    summary: JsonSummary,
    modules: Vec<JsonModule<'a>>,
    independent_modules: &'a [String],
    build_order: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    circular_dependencies: Vec<JsonCycle<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    inspections: Vec<JsonInspection<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let modules: Vec<JsonModule> = data
            .modules
            .iter()
            .map(|m| JsonModule {
                name: &m.name,
                description: &m.description,
                depends_on: &m.dependencies,
                required_by: &m.dependents,
                in_cycle: data.is_cyclic(&m.name),
            })
            .collect();

        let circular_dependencies: Vec<JsonCycle> = data
            .cycles
            .iter()
            .map(|c| JsonCycle {
                modules: c.modules(),
                path: c.cycle_path(),
            })
            .collect();

        let inspections: Vec<JsonInspection> = data
            .inspections
            .iter()
            .map(|i| JsonInspection {
                module: &i.module,
                direct_dependencies: &i.direct_dependencies,
                transitive_dependencies: &i.transitive_dependencies,
                dependents: &i.dependents,
                impact: &i.impact,
            })
            .collect();

        let export = JsonExport {
            project: &data.project_name,
            summary: JsonSummary {
                statistics: data.statistics,
                average_dependencies: data.statistics.average_dependencies(),
            },
            modules,
            independent_modules: &data.independent,
            build_order: data.build_order.as_deref(),
            circular_dependencies,
            inspections,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::build_graph;

    fn export_json(data: &ExportData) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(data, &mut output).unwrap();

        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    fn create_test_data() -> ExportData {
        let graph = build_graph(
            &[("A", "entry"), ("B", ""), ("C", ""), ("D", "core")],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        ExportData::new("test-project", &graph)
    }

    #[test]
    fn test_json_export_basic() {
        let parsed = export_json(&create_test_data());

        assert_eq!(parsed["project"], "test-project");
        assert_eq!(parsed["summary"]["module_count"], 4);
        assert_eq!(parsed["summary"]["edge_count"], 4);
        assert_eq!(parsed["summary"]["independent_count"], 1);
        assert_eq!(parsed["summary"]["has_cycle"], false);
        assert_eq!(parsed["summary"]["average_dependencies"], 1.0);
    }

    #[test]
    fn test_json_export_modules_list() {
        let parsed = export_json(&create_test_data());

        let modules = parsed["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 4);

        assert_eq!(modules[0]["name"], "A");
        assert_eq!(modules[0]["description"], "entry");
        assert_eq!(modules[0]["depends_on"], serde_json::json!(["B", "C"]));
        assert_eq!(modules[3]["required_by"], serde_json::json!(["B", "C"]));

        // Empty descriptions are omitted
        assert!(modules[1].get("description").is_none());
    }

    #[test]
    fn test_json_export_build_order() {
        let parsed = export_json(&create_test_data());

        assert_eq!(parsed["build_order"], serde_json::json!(["D", "B", "C", "A"]));
        assert_eq!(parsed["independent_modules"], serde_json::json!(["D"]));
        assert!(parsed.get("circular_dependencies").is_none());
    }

    #[test]
    fn test_json_export_with_cycles() {
        let graph = build_graph(&[("a", ""), ("b", "")], &[("a", "b"), ("b", "a")]);
        let data = ExportData::new("test", &graph);

        let parsed = export_json(&data);

        assert!(parsed["build_order"].is_null());
        let cycles = parsed["circular_dependencies"].as_array().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0]["path"], "a -> b -> a");
        assert_eq!(cycles[0]["modules"], serde_json::json!(["a", "b"]));
        assert_eq!(parsed["modules"][0]["in_cycle"], true);
        assert_eq!(parsed["summary"]["cycle_count"], 1);
    }

    #[test]
    fn test_json_export_inspections() {
        let graph = build_graph(
            &[("A", ""), ("B", ""), ("C", ""), ("D", "")],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );
        let mut data = ExportData::new("test", &graph);
        data.inspect(&graph, "D").unwrap();

        let parsed = export_json(&data);

        let inspection = &parsed["inspections"][0];
        assert_eq!(inspection["module"], "D");
        assert_eq!(inspection["direct_dependencies"], serde_json::json!([]));
        assert_eq!(inspection["dependents"], serde_json::json!(["B", "C"]));
        assert_eq!(inspection["impact"].as_array().unwrap().len(), 3);
    }
}
