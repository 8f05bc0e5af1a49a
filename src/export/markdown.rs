//! Markdown export implementation.
//!
//! Exports dependency analysis results in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let stats = &data.statistics;

        // Title
        writeln!(writer, "# Dependency Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Modules | {} |", stats.module_count)?;
        writeln!(writer, "| Dependencies | {} |", stats.edge_count)?;
        writeln!(writer, "| Independent Modules | {} |", stats.independent_count)?;
        writeln!(
            writer,
            "| Has Cycles | {} |",
            if stats.has_cycle { "yes" } else { "no" }
        )?;
        if stats.has_cycle {
            writeln!(writer, "| Cycles | {} |", stats.cycle_count)?;
        }
        writeln!(
            writer,
            "| Average Dependencies per Module | {:.2} |",
            stats.average_dependencies()
        )?;
        writeln!(writer)?;

        // Module table
        if !data.modules.is_empty() {
            writeln!(writer, "## Modules")?;
            writeln!(writer)?;
            writeln!(writer, "| Module | Description | Depends On | Required By |")?;
            writeln!(writer, "|--------|-------------|------------|-------------|")?;
            for module in &data.modules {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    module.name,
                    module.description,
                    join_or_dash(&module.dependencies),
                    join_or_dash(&module.dependents)
                )?;
            }
            writeln!(writer)?;
        }

        // Build order
        writeln!(writer, "## Build Order")?;
        writeln!(writer)?;
        match &data.build_order {
            Some(order) if order.is_empty() => writeln!(writer, "No modules registered.")?,
            Some(order) => {
                for (i, module) in order.iter().enumerate() {
                    writeln!(writer, "{}. {}", i + 1, module)?;
                }
            }
            None => writeln!(
                writer,
                "No build order exists: the graph contains circular dependencies."
            )?,
        }
        writeln!(writer)?;

        if !data.independent.is_empty() {
            writeln!(writer, "**Independent modules:** {}", data.independent.join(", "))?;
            writeln!(writer)?;
        }

        // Issues section
        if !data.cycles.is_empty() {
            writeln!(writer, "## Issues")?;
            writeln!(writer)?;
            writeln!(writer, "### Circular Dependencies")?;
            writeln!(writer)?;
            writeln!(
                writer,
                "The following circular dependencies were detected:"
            )?;
            writeln!(writer)?;
            for (i, cycle) in data.cycles.iter().enumerate() {
                writeln!(writer, "{}. `{}`", i + 1, cycle.cycle_path())?;
            }
            writeln!(writer)?;
            writeln!(
                writer,
                "**Modules in cycles:** {}",
                data.cyclic_modules.join(", ")
            )?;
            writeln!(writer)?;
        }

        // Inspections
        for inspection in &data.inspections {
            writeln!(writer, "## Module: {}", inspection.module)?;
            writeln!(writer)?;
            writeln!(
                writer,
                "- **Direct dependencies:** {}",
                join_or_dash(&inspection.direct_dependencies)
            )?;
            writeln!(
                writer,
                "- **Transitive dependencies:** {}",
                join_or_dash(&inspection.transitive_dependencies)
            )?;
            writeln!(
                writer,
                "- **Dependents:** {}",
                join_or_dash(&inspection.dependents)
            )?;
            writeln!(
                writer,
                "- **Impacted by a change:** {}",
                join_or_dash(&inspection.impact)
            )?;
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by depscope*")?;

        Ok(())
    }
}
