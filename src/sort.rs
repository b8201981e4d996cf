use log::trace;
use petgraph::{
    graph::NodeIndex,
    visit::{VisitMap, Visitable},
};

use crate::{ClassGraph, Components};

enum Step {
    /// Place all successors of the class, then the class itself.
    Visit(NodeIndex),
    /// All successors of the class have been placed.
    Emit(NodeIndex),
}

/// State of a single sort run.
struct SortContext<'a> {
    graph: &'a ClassGraph,
    components: &'a Components,
    finished: <petgraph::graph::DiGraph<String, ()> as Visitable>::Map,
    sorted: Vec<NodeIndex>,
}

impl<'a> SortContext<'a> {
    fn new(graph: &'a ClassGraph, components: &'a Components) -> Self {
        Self {
            graph,
            components,
            finished: graph.inner().visit_map(),
            sorted: Vec::with_capacity(graph.len()),
        }
    }

    /// Classes that must be placed before `node`, in reference order.
    ///
    /// These are the members of every component that the component of `node`
    /// directly depends on. Dependencies within the component itself are
    /// ignored, which is what keeps cycles from being followed forever.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let inner = self.graph.inner();
        let own = self.components.component_of(node);

        let mut ids = self
            .components
            .members_of(own)
            .iter()
            .flat_map(|&member| inner.neighbors(member))
            .map(|succ| self.components.component_of(succ))
            .filter(|&id| id != own)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();

        let mut successors = ids
            .into_iter()
            .flat_map(|id| self.components.members_of(id).iter().copied())
            .collect::<Vec<_>>();
        successors.sort_unstable();
        successors
    }

    fn run(mut self) -> Vec<NodeIndex> {
        // Pushed in reverse so that popping yields reference order.
        let mut stack = (0..self.graph.len())
            .rev()
            .map(|i| Step::Visit(NodeIndex::new(i)))
            .collect::<Vec<_>>();

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(node) => {
                    if self.finished.is_visited(&node) {
                        continue;
                    }
                    stack.push(Step::Emit(node));
                    for succ in self.successors(node).into_iter().rev() {
                        if !self.finished.is_visited(&succ) {
                            stack.push(Step::Visit(succ));
                        }
                    }
                }
                Step::Emit(node) => {
                    if self.finished.visit(node) {
                        trace!("Placing {}", self.graph.name(node));
                        self.sorted.push(node);
                    }
                }
            }
        }

        self.sorted
    }
}

/// Sort classes so that every class comes after its dependencies while
/// deviating as little as possible from the reference order.
///
/// The reference order is the order of [`ClassGraph::classes`]. Classes are
/// taken in that order. Before a class is placed, the classes it depends on
/// that haven't been placed yet are placed first, again in reference order and
/// recursively. Classes within one strongly connected component cannot be
/// ordered against each other and keep their reference order, while the
/// component as a whole is placed after everything it depends on.
///
/// The result contains every class of the graph exactly once. The same graph
/// always produces the same result.
pub fn sort(graph: &ClassGraph, components: &Components) -> Vec<String> {
    if graph.edge_count() == 0 {
        return graph.classes().map(|c| c.to_string()).collect();
    }

    let sorted = SortContext::new(graph, components).run();
    assert_eq!(sorted.len(), graph.len());
    sorted
        .into_iter()
        .map(|node| graph.name(node).to_string())
        .collect()
}
