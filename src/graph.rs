//! The dependency graph between classes.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::{declaration::DeclarationSource, Components};

/// Directed graph with an edge from each class to each of its dependencies.
///
/// Nodes are added in the order classes are first seen, so node indices double
/// as the reference order: the initial classes come first, followed by every
/// class discovered through declarations.
#[derive(Debug, Clone, Default)]
pub struct ClassGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl ClassGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for `initial` and everything it transitively depends on.
    ///
    /// Duplicate initial classes are dropped, keeping the first occurrence.
    /// Declarations are read breadth-first, at most once per class.
    pub fn build<I, S>(initial: I, source: &impl DeclarationSource) -> crate::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();

        let mut queue = VecDeque::new();
        for class in initial {
            if let Some((node, true)) = graph.add_class(class.as_ref()) {
                queue.push_back(node);
            }
        }
        debug!("Starting with {} classes", queue.len());

        while let Some(node) = queue.pop_front() {
            let class = graph.graph[node].clone();
            let Some(dependencies) = source.declaration(&class)? else {
                continue;
            };
            trace!("{class} depends on {dependencies:?}");

            for dependency in dependencies {
                let Some((dep_node, new)) = graph.add_class(&dependency) else {
                    continue;
                };
                if new {
                    trace!("Discovered {dependency} through {class}");
                    queue.push_back(dep_node);
                }
                graph.graph.update_edge(node, dep_node, ());
            }
        }

        debug!(
            "Found {} classes with {} dependencies",
            graph.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Add a class unless it already exists.
    ///
    /// Returns the node and whether it was newly added, or `None` if the name
    /// is empty after trimming.
    pub fn add_class(&mut self, class: &str) -> Option<(NodeIndex, bool)> {
        let class = class.trim();
        if class.is_empty() {
            return None;
        }
        if let Some(&node) = self.indices.get(class) {
            return Some((node, false));
        }
        let node = self.graph.add_node(class.to_string());
        self.indices.insert(class.to_string(), node);
        Some((node, true))
    }

    /// Record that `dependent` must come after `dependency`.
    ///
    /// Both classes are added if necessary. Adding the same edge twice has no
    /// further effect.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        let (Some((from, _)), Some((to, _))) =
            (self.add_class(dependent), self.add_class(dependency))
        else {
            return;
        };
        self.graph.update_edge(from, to, ());
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, class: &str) -> Option<NodeIndex> {
        self.indices.get(class).copied()
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// All classes in reference order.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(|class| class.as_str())
    }

    /// All `(dependent, dependency)` pairs, ordered by dependent.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| (e.source(), e.target()))
            .collect::<Vec<_>>();
        edges.sort_unstable();
        edges
            .into_iter()
            .map(|(from, to)| (self.name(from), self.name(to)))
            .collect()
    }

    /// The direct dependencies of a class in reference order.
    pub fn dependencies(&self, class: &str) -> Vec<&str> {
        let Some(node) = self.index_of(class) else {
            return vec![];
        };
        let mut deps = self.graph.neighbors(node).collect::<Vec<_>>();
        deps.sort_unstable();
        deps.into_iter().map(|n| self.name(n)).collect()
    }

    /// The classes in dependency order, see [`crate::sort`].
    pub fn sorted(&self) -> Vec<String> {
        let components = Components::new(self);
        crate::sort(self, &components)
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::MemorySource;

    use super::*;

    /// Records every lookup before delegating.
    struct Counting {
        inner: MemorySource,
        lookups: RefCell<Vec<String>>,
    }

    impl DeclarationSource for Counting {
        fn declaration(&self, class: &str) -> crate::Result<Option<Vec<String>>> {
            self.lookups.borrow_mut().push(class.to_string());
            self.inner.declaration(class)
        }
    }

    fn classes(graph: &ClassGraph) -> Vec<&str> {
        graph.classes().collect()
    }

    #[test]
    fn initial_duplicates_keep_first_position() {
        let initial = ["B", "A", "B", " A ", "C", ""];
        let graph = ClassGraph::build(initial, &MemorySource::new()).unwrap();
        assert_eq!(classes(&graph), vec!["B", "A", "C"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn discovery_is_breadth_first() {
        let source = MemorySource::new()
            .with("A", "C")
            .with("B", "E")
            .with("C", "D");
        let graph = ClassGraph::build(["A", "B"], &source).unwrap();
        assert_eq!(classes(&graph), vec!["A", "B", "C", "E", "D"]);
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let source = MemorySource::new().with("A", "B B\nB # B");
        let graph = ClassGraph::build(["A"], &source).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges(), vec![("A", "B")]);
    }

    #[test]
    fn shared_dependency_is_added_once() {
        let source = MemorySource::new()
            .with("A", "SHARED")
            .with("B", "SHARED")
            .with("SHARED", "BASE");
        let graph = ClassGraph::build(["A", "B"], &source).unwrap();
        assert_eq!(classes(&graph), vec!["A", "B", "SHARED", "BASE"]);
        assert_eq!(graph.dependencies("A"), vec!["SHARED"]);
        assert_eq!(graph.dependencies("SHARED"), vec!["BASE"]);
        assert!(graph.dependencies("BASE").is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let source = MemorySource::new().with("A", "B").with("B", "A");
        let graph = ClassGraph::build(["A"], &source).unwrap();
        assert_eq!(classes(&graph), vec!["A", "B"]);
        assert_eq!(graph.edges(), vec![("A", "B"), ("B", "A")]);
    }

    #[test]
    fn each_declaration_is_read_once() {
        let source = Counting {
            inner: MemorySource::new()
                .with("A", "S B")
                .with("B", "S A")
                .with("S", "A"),
            lookups: RefCell::new(vec![]),
        };
        let graph = ClassGraph::build(["A", "B", "A", "B"], &source).unwrap();
        assert_eq!(classes(&graph), vec!["A", "B", "S"]);
        assert_eq!(source.lookups.into_inner(), vec!["A", "B", "S"]);
    }

    #[test]
    fn manual_construction() {
        let mut graph = ClassGraph::new();
        graph.add_dependency("A", "B");
        graph.add_dependency("A", "B");
        graph.add_dependency("A", "  ");
        assert_eq!(classes(&graph), vec!["A", "B"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.index_of("B"), Some(NodeIndex::new(1)));
        assert_eq!(graph.index_of("C"), None);
    }
}
