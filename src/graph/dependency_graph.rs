//! Dependency graph storage and mutation.
//!
//! Modules live once in a [`ModuleRegistry`]; edges are adjacency lists of
//! module names keyed by the dependent module. An edge `origin -> target`
//! means "origin depends on target".

use super::error::{GraphError, GraphResult, InvalidEdgeKind};
use super::registry::{Module, ModuleRegistry};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A directed graph of software modules and their dependencies.
///
/// # Invariants
///
/// - every name in an adjacency list is a registered module
/// - no module depends on itself
/// - an edge `origin -> target` is stored at most once
///
/// # Example
///
/// ```rust
/// use depscope::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_module("api", "REST interface").unwrap();
/// graph.add_module("auth", "Login and sessions").unwrap();
/// graph.add_dependency("api", "auth").unwrap();
///
/// assert_eq!(graph.module_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.direct_dependencies("api"), ["auth".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Registered modules in registration order
    pub(super) registry: ModuleRegistry,
    /// Module name -> names it depends on, in insertion order
    pub(super) edges: IndexMap<String, Vec<String>>,
}

/// A module together with both directions of its direct relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    /// Module name
    pub name: String,
    /// Module description
    pub description: String,
    /// Modules this one depends on
    pub dependencies: Vec<String>,
    /// Modules that depend on this one
    pub dependents: Vec<String>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new module with no dependencies.
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyName`] for an empty name and
    /// [`GraphError::AlreadyExists`] if the name is taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::{DependencyGraph, GraphError};
    ///
    /// let mut graph = DependencyGraph::new();
    /// assert!(graph.add_module("db", "Data access").is_ok());
    /// assert_eq!(
    ///     graph.add_module("db", ""),
    ///     Err(GraphError::AlreadyExists("db".to_string()))
    /// );
    /// ```
    pub fn add_module(&mut self, name: &str, description: &str) -> GraphResult<()> {
        if name.is_empty() {
            return Err(GraphError::EmptyName);
        }
        if !self.registry.insert(Module::new(name, description)) {
            debug!(module = name, "rejected duplicate module");
            return Err(GraphError::AlreadyExists(name.to_string()));
        }
        self.edges.insert(name.to_string(), Vec::new());
        debug!(module = name, "module added");
        Ok(())
    }

    /// Removes a module, its outgoing edges, and every edge pointing at it.
    ///
    /// Dependents are not consulted; callers that want to warn about them
    /// should query [`DependencyGraph::dependents`] first.
    ///
    /// # Returns
    ///
    /// The removed module.
    pub fn remove_module(&mut self, name: &str) -> GraphResult<Module> {
        let module = self
            .registry
            .remove(name)
            .ok_or_else(|| GraphError::NotFound(name.to_string()))?;
        self.edges.shift_remove(name);

        let mut scrubbed = 0;
        for deps in self.edges.values_mut() {
            let before = deps.len();
            deps.retain(|dep| dep != name);
            scrubbed += before - deps.len();
        }

        debug!(module = name, scrubbed_edges = scrubbed, "module removed");
        Ok(module)
    }

    /// Records that `origin` depends on `target`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotFound`] if either module is unknown
    /// - [`GraphError::InvalidEdge`] for a self-dependency or a duplicate edge
    pub fn add_dependency(&mut self, origin: &str, target: &str) -> GraphResult<()> {
        for name in [origin, target] {
            if !self.registry.contains(name) {
                debug!(origin, target, missing = name, "rejected dependency");
                return Err(GraphError::NotFound(name.to_string()));
            }
        }

        let kind = if origin == target {
            Some(InvalidEdgeKind::SelfDependency)
        } else if self.has_dependency(origin, target) {
            Some(InvalidEdgeKind::Duplicate)
        } else {
            None
        };
        if let Some(kind) = kind {
            debug!(origin, target, reason = %kind, "rejected dependency");
            return Err(GraphError::InvalidEdge {
                origin: origin.to_string(),
                target: target.to_string(),
                kind,
            });
        }

        self.edges
            .entry(origin.to_string())
            .or_default()
            .push(target.to_string());
        debug!(origin, target, "dependency added");
        Ok(())
    }

    /// Removes the edge `origin -> target`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if `origin` is unknown and
    /// [`GraphError::MissingDependency`] if the edge does not exist.
    pub fn remove_dependency(&mut self, origin: &str, target: &str) -> GraphResult<()> {
        let deps = self
            .edges
            .get_mut(origin)
            .ok_or_else(|| GraphError::NotFound(origin.to_string()))?;

        let Some(pos) = deps.iter().position(|dep| dep == target) else {
            return Err(GraphError::MissingDependency {
                origin: origin.to_string(),
                target: target.to_string(),
            });
        };
        deps.remove(pos);

        debug!(origin, target, "dependency removed");
        Ok(())
    }

    /// Checks if the edge `origin -> target` is stored.
    pub fn has_dependency(&self, origin: &str, target: &str) -> bool {
        self.edges
            .get(origin)
            .is_some_and(|deps| deps.iter().any(|dep| dep == target))
    }

    /// Gets the modules `name` depends on directly, in insertion order.
    ///
    /// Unknown modules have no dependencies.
    pub fn direct_dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Gets the modules that depend directly on `name`, in registry order.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|dep| dep == name))
            .map(|(origin, _)| origin.as_str())
            .collect()
    }

    /// Gets modules with no dependencies, in registry order.
    ///
    /// These can be built first.
    pub fn independent_modules(&self) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Gets a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.registry.get(name)
    }

    /// Checks if a module is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Iterates modules in registry order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.registry.iter()
    }

    /// Returns the number of registered modules.
    pub fn module_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Checks if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Lists every edge as `(origin, target)`, in registry then insertion order.
    pub fn dependency_pairs(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(origin, deps)| {
                deps.iter()
                    .map(move |target| (origin.as_str(), target.as_str()))
            })
            .collect()
    }

    /// Summarizes every module with its direct relations, sorted by name.
    pub fn module_summaries(&self) -> Vec<ModuleSummary> {
        let reverse = self.reverse_index();
        let mut summaries: Vec<ModuleSummary> = self
            .registry
            .iter()
            .map(|module| ModuleSummary {
                name: module.name.clone(),
                description: module.description.clone(),
                dependencies: self.direct_dependencies(&module.name).to_vec(),
                dependents: reverse
                    .get(module.name.as_str())
                    .map(|origins| origins.iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Maps each target to the modules depending on it, in registry order.
    pub(super) fn reverse_index(&self) -> HashMap<&str, Vec<&str>> {
        let mut reverse: HashMap<&str, Vec<&str>> = HashMap::with_capacity(self.edges.len());
        for (origin, deps) in &self.edges {
            for target in deps {
                reverse
                    .entry(target.as_str())
                    .or_default()
                    .push(origin.as_str());
            }
        }
        reverse
    }
}
