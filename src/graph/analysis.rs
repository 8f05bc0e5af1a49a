//! Graph algorithms over [`DependencyGraph`].
//!
//! Depth-first walks use an explicit stack of `(module, next child)` frames
//! so deep dependency chains never exhaust the call stack.

use super::dependency_graph::DependencyGraph;
use super::error::{GraphError, GraphResult};
use indexmap::IndexSet;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::trace;

/// A circular dependency found by [`DependencyGraph::detect_cycles`].
///
/// The path starts and ends with the same module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleInfo {
    /// Module names along the cycle, first and last are equal
    pub path: Vec<String>,
}

impl CycleInfo {
    /// Creates cycle info from a closed path.
    pub fn new(path: Vec<String>) -> Self {
        Self { path }
    }

    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        self.path.join(" -> ")
    }

    /// Returns the distinct modules in the cycle (the path without its
    /// closing repetition).
    pub fn modules(&self) -> &[String] {
        match self.path.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Returns the number of modules in the cycle.
    pub fn len(&self) -> usize {
        self.modules().len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Outcome of cycle detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// At most one cycle per depth-first root
    pub cycles: Vec<CycleInfo>,
}

impl CycleReport {
    /// Returns true if at least one cycle was found.
    pub fn has_cycle(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Summary counters for a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub module_count: usize,
    pub edge_count: usize,
    pub independent_count: usize,
    pub has_cycle: bool,
    pub cycle_count: usize,
}

impl GraphStatistics {
    /// Average number of direct dependencies per module (0 for an empty graph).
    pub fn average_dependencies(&self) -> f64 {
        if self.module_count == 0 {
            return 0.0;
        }
        self.edge_count as f64 / self.module_count as f64
    }
}

impl DependencyGraph {
    /// Gets every module reachable from `name` through dependency edges.
    ///
    /// Modules are returned in depth-first discovery order. `name` itself is
    /// included only when it lies on a cycle. Unknown modules yield an
    /// empty set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// for name in ["app", "http", "tls"] {
    ///     graph.add_module(name, "").unwrap();
    /// }
    /// graph.add_dependency("app", "http").unwrap();
    /// graph.add_dependency("http", "tls").unwrap();
    ///
    /// let deps = graph.transitive_dependencies("app");
    /// assert_eq!(deps.len(), 2);
    /// assert!(deps.contains("tls"));
    /// ```
    pub fn transitive_dependencies(&self, name: &str) -> IndexSet<String> {
        let mut visited: IndexSet<String> = IndexSet::new();
        if !self.contains(name) {
            return visited;
        }

        let mut stack: Vec<(&str, usize)> = vec![(name, 0)];
        while let Some(&(node, next)) = stack.last() {
            let Some(dep) = self.direct_dependencies(node).get(next) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if visited.insert(dep.clone()) {
                stack.push((dep.as_str(), 0));
            }
        }

        trace!(module = name, reachable = visited.len(), "transitive dependencies");
        visited
    }

    /// Gets every module transitively affected by a change to `name`.
    ///
    /// This is the reverse closure of [`DependencyGraph::transitive_dependencies`]:
    /// `y` is in `transitive_dependencies(x)` exactly when `x` is in
    /// `impact_analysis(y)`.
    pub fn impact_analysis(&self, name: &str) -> IndexSet<String> {
        let mut affected: IndexSet<String> = IndexSet::new();
        if !self.contains(name) {
            return affected;
        }

        let reverse = self.reverse_index();
        let mut queue: VecDeque<&str> = VecDeque::from([name]);
        while let Some(module) = queue.pop_front() {
            for &dependent in reverse.get(module).map_or(&[][..], Vec::as_slice) {
                if affected.insert(dependent.to_string()) {
                    queue.push_back(dependent);
                }
            }
        }

        trace!(module = name, affected = affected.len(), "impact analysis");
        affected
    }

    /// Detects circular dependencies with a depth-first search.
    ///
    /// Roots are tried in registry order, skipping modules already visited.
    /// The search of a root stops at its first back edge, so at most one
    /// cycle is reported per root; a graph with several overlapping cycles
    /// may report fewer cycles than it has. Whether a cycle exists is
    /// always classified correctly.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// for name in ["a", "b", "c"] {
    ///     graph.add_module(name, "").unwrap();
    /// }
    /// graph.add_dependency("a", "b").unwrap();
    /// graph.add_dependency("b", "c").unwrap();
    /// graph.add_dependency("c", "a").unwrap();
    ///
    /// let report = graph.detect_cycles();
    /// assert!(report.has_cycle());
    /// assert_eq!(report.cycles[0].cycle_path(), "a -> b -> c -> a");
    /// ```
    pub fn detect_cycles(&self) -> CycleReport {
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.module_count());
        let mut cycles = Vec::new();

        for root in self.registry.names() {
            if visited.contains(root) {
                continue;
            }
            if let Some(cycle) = self.first_cycle_from(root, &mut visited) {
                trace!(root, cycle = %cycle.cycle_path(), "cycle found");
                cycles.push(cycle);
            }
        }

        CycleReport { cycles }
    }

    /// Walks depth-first from `root` until the first back edge.
    fn first_cycle_from<'a>(
        &'a self,
        root: &'a str,
        visited: &mut HashSet<&'a str>,
    ) -> Option<CycleInfo> {
        let mut on_stack: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        visited.insert(root);
        on_stack.insert(root);

        while let Some(&(node, next)) = stack.last() {
            let Some(dep) = self.direct_dependencies(node).get(next) else {
                on_stack.remove(node);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let dep = dep.as_str();
            if visited.insert(dep) {
                on_stack.insert(dep);
                stack.push((dep, 0));
            } else if on_stack.contains(dep) {
                let start = stack.iter().position(|&(n, _)| n == dep)?;
                let mut path: Vec<String> =
                    stack[start..].iter().map(|&(n, _)| n.to_string()).collect();
                path.push(dep.to_string());
                return Some(CycleInfo::new(path));
            }
        }

        None
    }

    /// Computes a build order: every module after all of its dependencies.
    ///
    /// Uses Kahn's algorithm, always emitting the lexicographically smallest
    /// ready module so the order is reproducible.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclePresent`] if the graph has any cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// for name in ["a", "b", "c", "d"] {
    ///     graph.add_module(name, "").unwrap();
    /// }
    /// graph.add_dependency("a", "b").unwrap();
    /// graph.add_dependency("a", "c").unwrap();
    /// graph.add_dependency("b", "d").unwrap();
    /// graph.add_dependency("c", "d").unwrap();
    ///
    /// assert_eq!(graph.topological_order().unwrap(), ["d", "b", "c", "a"]);
    /// ```
    pub fn topological_order(&self) -> GraphResult<Vec<String>> {
        let report = self.detect_cycles();
        if report.has_cycle() {
            return Err(GraphError::CyclePresent {
                cycles: report.cycles,
            });
        }

        let reverse = self.reverse_index();
        let mut pending: HashMap<&str, usize> = self
            .edges
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.len()))
            .collect();
        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&name, _)| name)
            .collect();

        let mut order = Vec::with_capacity(self.module_count());
        while let Some(module) = ready.pop_first() {
            order.push(module.to_string());
            for &dependent in reverse.get(module).map_or(&[][..], Vec::as_slice) {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != self.module_count() {
            // Unreachable while detect_cycles is sound; report rather than
            // hand back a partial order.
            return Err(GraphError::CyclePresent {
                cycles: self.detect_cycles().cycles,
            });
        }

        trace!(modules = order.len(), "topological order computed");
        Ok(order)
    }

    /// Computes summary counters from the current graph.
    pub fn statistics(&self) -> GraphStatistics {
        let report = self.detect_cycles();
        GraphStatistics {
            module_count: self.module_count(),
            edge_count: self.edge_count(),
            independent_count: self.independent_modules().len(),
            has_cycle: report.has_cycle(),
            cycle_count: report.cycles.len(),
        }
    }

    /// Checks if the graph contains cycles.
    ///
    /// Agrees with [`DependencyGraph::detect_cycles`] but does not build paths.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.to_petgraph())
    }

    /// Groups modules that are mutually reachable.
    ///
    /// Unlike [`DependencyGraph::detect_cycles`], this reports every module
    /// taking part in any cycle. Each group is sorted by name and groups are
    /// ordered by their first member.
    pub fn strongly_connected_components(&self) -> Vec<Vec<String>> {
        let graph = self.to_petgraph();
        let mut components: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<String> = scc
                    .iter()
                    .filter_map(|&idx| graph.node_weight(idx))
                    .map(|name| name.to_string())
                    .collect();
                names.sort();
                names
            })
            .collect();
        components.sort();
        components
    }

    /// Returns a set of module names that are part of any cycle.
    pub fn modules_in_cycles(&self) -> HashSet<String> {
        self.strongly_connected_components()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Builds a petgraph view with edges pointing from dependent to dependency.
    fn to_petgraph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.module_count(), self.edge_count());
        let indices: HashMap<&str, NodeIndex> = self
            .registry
            .names()
            .map(|name| (name, graph.add_node(name)))
            .collect();

        for (origin, target) in self.dependency_pairs() {
            if let (Some(&from), Some(&to)) = (indices.get(origin), indices.get(target)) {
                graph.add_edge(from, to, ());
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(names: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for name in names {
            graph.add_module(name, "").unwrap();
        }
        for (origin, target) in edges {
            graph.add_dependency(origin, target).unwrap();
        }
        graph
    }

    fn diamond() -> DependencyGraph {
        build(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        )
    }

    fn assert_valid_cycle(graph: &DependencyGraph, cycle: &CycleInfo) {
        assert!(cycle.path.len() >= 3);
        assert_eq!(cycle.path.first(), cycle.path.last());
        for pair in cycle.path.windows(2) {
            assert!(
                graph.has_dependency(&pair[0], &pair[1]),
                "{} -> {} is not an edge",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_diamond_scenario() {
        let graph = diamond();

        assert_eq!(graph.independent_modules(), vec!["D"]);

        let order = graph.topological_order().unwrap();
        assert_eq!(order, vec!["D", "B", "C", "A"]);

        let stats = graph.statistics();
        assert_eq!(stats.module_count, 4);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.independent_count, 1);
        assert!(!stats.has_cycle);
        assert_eq!(stats.cycle_count, 0);
    }

    #[test]
    fn test_topological_order_ties_are_lexicographic() {
        let graph = build(&["Z", "A"], &[]);
        assert_eq!(graph.topological_order().unwrap(), vec!["A", "Z"]);
    }

    #[test]
    fn test_topological_order_respects_every_edge() {
        let graph = build(
            &["app", "web", "db", "log", "cfg", "cache"],
            &[
                ("app", "web"),
                ("app", "db"),
                ("web", "log"),
                ("web", "cache"),
                ("db", "log"),
                ("db", "cfg"),
                ("cache", "cfg"),
            ],
        );

        let order = graph.topological_order().unwrap();
        assert_eq!(order.len(), graph.module_count());

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        for (origin, target) in graph.dependency_pairs() {
            assert!(position[target] < position[origin], "{target} after {origin}");
        }
    }

    #[test]
    fn test_topological_order_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn test_cycle_blocks_topological_order() {
        let graph = build(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let report = graph.detect_cycles();
        assert!(report.has_cycle());
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].path, vec!["A", "B", "C", "A"]);
        assert_eq!(report.cycles[0].len(), 3);

        match graph.topological_order() {
            Err(GraphError::CyclePresent { cycles }) => assert_eq!(cycles, report.cycles),
            other => panic!("expected CyclePresent, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_cycles_acyclic() {
        let report = diamond().detect_cycles();
        assert!(!report.has_cycle());
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn test_cycle_path_starts_at_repeated_module() {
        // entry -> x -> y -> z -> x
        let graph = build(
            &["entry", "x", "y", "z"],
            &[("entry", "x"), ("x", "y"), ("y", "z"), ("z", "x")],
        );

        let report = graph.detect_cycles();
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].cycle_path(), "x -> y -> z -> x");
        assert_valid_cycle(&graph, &report.cycles[0]);
    }

    #[test]
    fn test_one_cycle_reported_per_root() {
        // Two cycles reachable from the same root: a <-> b and a -> c -> a.
        let graph = build(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("a", "c"), ("c", "a")],
        );

        let report = graph.detect_cycles();
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].path, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_independent_cycles_from_separate_roots() {
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
        );

        let report = graph.detect_cycles();
        assert_eq!(report.cycles.len(), 2);
        for cycle in &report.cycles {
            assert_valid_cycle(&graph, cycle);
        }
        assert_eq!(graph.statistics().cycle_count, 2);
    }

    #[test]
    fn test_cycles_after_aborted_root_are_bona_fide() {
        // The walk from "a" stops inside a <-> b; "c" later reaches "b".
        let graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("c", "b"), ("c", "d"), ("d", "c")],
        );

        let report = graph.detect_cycles();
        assert!(report.has_cycle());
        for cycle in &report.cycles {
            assert_valid_cycle(&graph, cycle);
        }
        assert_eq!(report.cycles[1].path, vec!["c", "d", "c"]);
    }

    #[test]
    fn test_has_cycles_agrees_with_detect_cycles() {
        let acyclic = diamond();
        assert!(!acyclic.has_cycles());

        let mut cyclic = diamond();
        cyclic.add_dependency("D", "A").unwrap();
        assert!(cyclic.has_cycles());
        assert!(cyclic.detect_cycles().has_cycle());
    }

    #[test]
    fn test_transitive_dependencies() {
        let graph = diamond();

        let deps = graph.transitive_dependencies("A");
        let names: Vec<&str> = deps.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["B", "D", "C"]);

        assert!(graph.transitive_dependencies("D").is_empty());
        assert!(graph.transitive_dependencies("ghost").is_empty());
    }

    #[test]
    fn test_transitive_dependencies_include_self_on_cycle() {
        let graph = build(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let deps = graph.transitive_dependencies("A");
        assert_eq!(deps.len(), 3);
        assert!(deps.contains("A"));
    }

    #[test]
    fn test_impact_analysis() {
        let graph = diamond();

        let impact = graph.impact_analysis("D");
        assert_eq!(impact.len(), 3);
        assert!(impact.contains("A"));
        assert!(impact.contains("B"));
        assert!(impact.contains("C"));

        assert!(graph.impact_analysis("A").is_empty());
        assert!(graph.impact_analysis("ghost").is_empty());
    }

    #[test]
    fn test_impact_analysis_terminates_on_cycles() {
        let graph = build(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);

        let impact = graph.impact_analysis("B");
        assert_eq!(impact.len(), 3);
        assert!(impact.contains("B"));
    }

    #[test]
    fn test_impact_is_inverse_of_transitive() {
        let graph = build(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "b"), ("d", "c"), ("e", "a")],
        );
        let names: Vec<&str> = graph.modules().map(|m| m.name.as_str()).collect();

        for x in &names {
            let forward = graph.transitive_dependencies(x);
            for y in &names {
                let reverse = graph.impact_analysis(y);
                assert_eq!(
                    forward.contains(*y),
                    reverse.contains(*x),
                    "mismatch for x={x}, y={y}"
                );
            }
        }
    }

    #[test]
    fn test_strongly_connected_components() {
        let graph = build(
            &["a", "b", "c", "d", "e"],
            &[("b", "a"), ("a", "b"), ("c", "d"), ("d", "e"), ("e", "c")],
        );

        let components = graph.strongly_connected_components();
        assert_eq!(components, vec![vec!["a", "b"], vec!["c", "d", "e"]]);

        let in_cycles = graph.modules_in_cycles();
        assert_eq!(in_cycles.len(), 5);
        assert!(diamond().modules_in_cycles().is_empty());
    }

    #[test]
    fn test_statistics_with_cycles() {
        let graph = build(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("a", "c")],
        );

        let stats = graph.statistics();
        assert_eq!(stats.module_count, 3);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.independent_count, 1);
        assert!(stats.has_cycle);
        assert_eq!(stats.cycle_count, 1);
        assert!((stats.average_dependencies() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_dependencies_empty_graph() {
        let stats = DependencyGraph::new().statistics();
        assert_eq!(stats.average_dependencies(), 0.0);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut graph = DependencyGraph::new();
        let count = 20_000;
        for i in 0..count {
            graph.add_module(&format!("m{i:05}"), "").unwrap();
        }
        for i in 1..count {
            graph
                .add_dependency(&format!("m{i:05}"), &format!("m{:05}", i - 1))
                .unwrap();
        }

        assert!(!graph.detect_cycles().has_cycle());
        assert_eq!(graph.transitive_dependencies("m19999").len(), count - 1);
        assert_eq!(graph.impact_analysis("m00000").len(), count - 1);
        let order = graph.topological_order().unwrap();
        assert_eq!(order.first().map(String::as_str), Some("m00000"));
    }

    #[test]
    fn test_cycle_info_helpers() {
        let cycle = CycleInfo::new(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(cycle.cycle_path(), "a -> b -> a");
        assert_eq!(cycle.modules(), ["a", "b"]);
        assert_eq!(cycle.len(), 2);
        assert!(!cycle.is_empty());

        let empty = CycleInfo::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.cycle_path(), "");
    }
}
