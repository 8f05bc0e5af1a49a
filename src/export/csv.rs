//! CSV export implementation.
//!
//! Exports one row per module for spreadsheet use. Multi-valued columns
//! are joined with `;`.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn escape_list(values: &[String]) -> String {
        Self::escape_field(&values.join(";"))
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "name,description,depends_on,required_by,build_position,in_cycle"
        )?;

        for module in &data.modules {
            let build_position = data
                .build_order
                .as_ref()
                .and_then(|order| order.iter().position(|m| *m == module.name))
                .map(|pos| (pos + 1).to_string())
                .unwrap_or_default();

            writeln!(
                writer,
                "{},{},{},{},{},{}",
                Self::escape_field(&module.name),
                Self::escape_field(&module.description),
                Self::escape_list(&module.dependencies),
                Self::escape_list(&module.dependents),
                build_position,
                data.is_cyclic(&module.name)
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::build_graph;

    fn export_lines(data: &ExportData) -> Vec<String> {
        let mut output = Vec::new();
        CsvExporter.export(data, &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_csv_export_basic() {
        let graph = build_graph(
            &[("app", "Entry point"), ("db", ""), ("log", "")],
            &[("app", "db"), ("app", "log"), ("db", "log")],
        );
        let data = ExportData::new("test", &graph);
        let lines = export_lines(&data);

        // Header + 3 modules
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "name,description,depends_on,required_by,build_position,in_cycle"
        );
        assert_eq!(lines[1], "app,Entry point,db;log,,3,false");
        assert_eq!(lines[2], "db,,log,app,2,false");
        assert_eq!(lines[3], "log,,,app;db,1,false");
    }

    #[test]
    fn test_csv_export_with_cycles() {
        let graph = build_graph(
            &[("a", ""), ("b", ""), ("c", "")],
            &[("a", "b"), ("b", "a")],
        );
        let data = ExportData::new("test", &graph);
        let lines = export_lines(&data);

        // No build order while cyclic; a and b are in the cycle, c is not
        assert!(lines[1].ends_with(",,true")); // a
        assert!(lines[2].ends_with(",,true")); // b
        assert!(lines[3].ends_with(",,false")); // c
    }

    #[test]
    fn test_csv_escape_field() {
        // No escaping needed
        assert_eq!(CsvExporter::escape_field("simple"), "simple");

        // Contains comma
        assert_eq!(
            CsvExporter::escape_field("has,comma"),
            "\"has,comma\""
        );

        // Contains quotes
        assert_eq!(
            CsvExporter::escape_field("has\"quote"),
            "\"has\"\"quote\""
        );

        // Contains newline
        assert_eq!(
            CsvExporter::escape_field("has\nnewline"),
            "\"has\nnewline\""
        );
    }

    #[test]
    fn test_csv_export_special_characters() {
        let graph = build_graph(&[("REST API", "Web services, public")], &[]);
        let data = ExportData::new("test", &graph);

        let lines = export_lines(&data);
        assert_eq!(lines[1], "REST API,\"Web services, public\",,,1,false");
    }
}
