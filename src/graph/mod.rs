//! Graph module for module dependency modeling.
//!
//! This module provides the [`DependencyGraph`] struct for registering
//! modules, recording which modules depend on which, and analyzing the
//! result: cycle detection, build ordering, transitive closures, and
//! reverse impact.
//!
//! # Example
//!
//! ```rust
//! use depscope::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_module("api", "REST interface").unwrap();
//! graph.add_module("auth", "Login and sessions").unwrap();
//! graph.add_dependency("api", "auth").unwrap();
//!
//! assert_eq!(graph.module_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.topological_order().unwrap(), ["auth", "api"]);
//! ```

mod analysis;
mod dependency_graph;
mod error;
mod registry;

pub use analysis::{CycleInfo, CycleReport, GraphStatistics};
pub use dependency_graph::{DependencyGraph, ModuleSummary};
pub use error::{GraphError, GraphResult, InvalidEdgeKind};
pub use registry::{Module, ModuleRegistry};
