use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use depscope::export::{self, ExportData, ExportFormat};
use depscope::graph::DependencyGraph;
use depscope::hierarchy::{HierarchyStatistics, HierarchyTree, NodeKind, DEFAULT_ROOT_NAME};
use depscope::logging::{self, LogLevel};
use depscope::sample;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Module dependency graph and institutional hierarchy analyzer", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a module dependency graph and print its analysis
    Projects {
        /// Start from the built-in example project
        #[arg(long)]
        sample: bool,

        /// Project name shown in the report
        #[arg(long, default_value = "project")]
        name: String,

        /// Register a module
        #[arg(short, long = "module", value_name = "NAME[=DESCRIPTION]")]
        modules: Vec<String>,

        /// Record that ORIGIN depends on TARGET
        #[arg(short, long = "depends", value_name = "ORIGIN:TARGET")]
        depends: Vec<String>,

        /// Remove a module and every edge touching it
        #[arg(long = "remove-module", value_name = "NAME")]
        remove_modules: Vec<String>,

        /// Remove a single dependency
        #[arg(long = "remove-depends", value_name = "ORIGIN:TARGET")]
        remove_depends: Vec<String>,

        /// Include transitive dependencies and impact for a module
        #[arg(short, long, value_name = "NAME")]
        inspect: Vec<String>,

        /// Output format (json, csv, markdown)
        #[arg(short, long, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
    },
    /// Build an institutional hierarchy and print it
    Hierarchy {
        /// Start from the built-in example university
        #[arg(long)]
        sample: bool,

        /// Name of the root rectorate
        #[arg(long, conflicts_with = "sample")]
        root: Option<String>,

        /// Insert an entity below PARENT
        #[arg(long, value_name = "PARENT:NAME:KIND[:DESCRIPTION]")]
        insert: Vec<String>,

        /// Remove an entity and its subtree
        #[arg(long, value_name = "NAME")]
        remove: Vec<String>,

        /// Print the path from the root to an entity
        #[arg(long, value_name = "NAME")]
        path: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = TreeFormat::Text)]
        format: TreeFormat,
    },
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TreeFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LogLevel::from_flags(cli.verbose, cli.quiet))?;

    match cli.command {
        Some(Commands::Projects {
            sample,
            name,
            modules,
            depends,
            remove_modules,
            remove_depends,
            inspect,
            format,
        }) => {
            let graph = build_graph(sample, &modules, &depends, &remove_modules, &remove_depends)?;

            let mut data = ExportData::new(name, &graph);
            for module in &inspect {
                data.inspect(&graph, module)
                    .with_context(|| format!("cannot inspect '{}'", module))?;
            }

            let mut stdout = io::stdout().lock();
            export::export(format, &data, &mut stdout).context("failed to write report")?;
        }
        Some(Commands::Hierarchy {
            sample,
            root,
            insert,
            remove,
            path,
            format,
        }) => {
            let tree = build_tree(sample, root, &insert, &remove)?;
            print_tree(&tree, &path, format)?;
        }
        Some(Commands::Version) => {
            println!("depscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("depscope - Module Dependency Analyzer");
            println!("Run 'depscope projects --sample' to analyze the example project");
            println!("Run 'depscope hierarchy --sample' to show the example university");
            println!("Run 'depscope --help' for more information");
        }
    }

    Ok(())
}

fn build_graph(
    sample: bool,
    modules: &[String],
    depends: &[String],
    remove_modules: &[String],
    remove_depends: &[String],
) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    if sample {
        sample::load_sample_project(&mut graph).context("failed to load sample project")?;
        info!(modules = graph.module_count(), "sample project loaded");
    }

    for spec in modules {
        let (name, description) = spec.split_once('=').unwrap_or((spec.as_str(), ""));
        graph
            .add_module(name.trim(), description.trim())
            .with_context(|| format!("cannot add module '{}'", name.trim()))?;
    }

    for spec in depends {
        let (origin, target) = parse_pair(spec)?;
        graph
            .add_dependency(origin, target)
            .with_context(|| format!("cannot add dependency '{}'", spec))?;
    }

    for spec in remove_depends {
        let (origin, target) = parse_pair(spec)?;
        graph
            .remove_dependency(origin, target)
            .with_context(|| format!("cannot remove dependency '{}'", spec))?;
    }

    for name in remove_modules {
        let dependents = graph.dependents(name);
        if !dependents.is_empty() {
            warn!(
                module = %name,
                dependents = ?dependents,
                "removing a module other modules depend on"
            );
        }
        graph
            .remove_module(name)
            .with_context(|| format!("cannot remove module '{}'", name))?;
    }

    Ok(graph)
}

fn parse_pair(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once(':') {
        Some((origin, target)) if !origin.trim().is_empty() && !target.trim().is_empty() => {
            Ok((origin.trim(), target.trim()))
        }
        _ => bail!("expected ORIGIN:TARGET, got '{}'", spec),
    }
}

fn build_tree(
    sample: bool,
    root: Option<String>,
    insert: &[String],
    remove: &[String],
) -> Result<HierarchyTree> {
    let mut tree = if sample {
        sample::sample_university().context("failed to build sample university")?
    } else {
        HierarchyTree::new(root.unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string()))
    };

    for spec in insert {
        let mut parts = spec.splitn(4, ':').map(str::trim);
        let (Some(parent), Some(name), Some(kind)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("expected PARENT:NAME:KIND[:DESCRIPTION], got '{}'", spec);
        };
        let description = parts.next().unwrap_or("");
        let kind: NodeKind = kind.parse().map_err(anyhow::Error::msg)?;

        tree.insert(parent, name, kind, description)
            .with_context(|| format!("cannot insert '{}'", name))?;
    }

    for name in remove {
        let removed = tree
            .remove(name)
            .with_context(|| format!("cannot remove '{}'", name))?;
        info!(name = %removed.name, children = removed.children.len(), "subtree removed");
    }

    Ok(tree)
}

#[derive(Serialize)]
struct TreeReport<'a> {
    tree: &'a HierarchyTree,
    statistics: HierarchyStatistics,
    paths: Vec<Vec<&'a str>>,
}

fn print_tree(tree: &HierarchyTree, paths: &[String], format: TreeFormat) -> Result<()> {
    let mut resolved = Vec::with_capacity(paths.len());
    for name in paths {
        let path: Vec<&str> = tree
            .path_to(name)
            .into_iter()
            .map(|node| node.name.as_str())
            .collect();
        if path.is_empty() {
            bail!("entity '{}' not found", name);
        }
        resolved.push(path);
    }

    let stats = tree.statistics();
    let mut stdout = io::stdout().lock();
    match format {
        TreeFormat::Json => {
            let report = TreeReport {
                tree,
                statistics: stats,
                paths: resolved,
            };
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
        TreeFormat::Text => {
            writeln!(stdout, "{}", tree.render())?;
            writeln!(stdout)?;
            for kind in NodeKind::ALL {
                writeln!(stdout, "{:<12} {}", kind.label(), stats.count(kind))?;
            }
            for path in &resolved {
                writeln!(stdout)?;
                writeln!(stdout, "{}", path.join(" -> "))?;
            }
        }
    }

    Ok(())
}
