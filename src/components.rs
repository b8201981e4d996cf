//! Strongly connected components of a [`ClassGraph`].
//!
//! Classes in the same component depend on each other, directly or not, so
//! none of them can legally be ordered before the others. The sorter treats
//! each component as a single unit.

use petgraph::{algo::kosaraju_scc, graph::NodeIndex};

use crate::ClassGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Components {
    /// Indexed by node index.
    component_of: Vec<ComponentId>,
    /// Members of each component, sorted by node index.
    members: Vec<Vec<NodeIndex>>,
    /// Whether each component contains a cycle.
    cyclic: Vec<bool>,
}

impl Components {
    pub fn new(graph: &ClassGraph) -> Self {
        let inner = graph.inner();

        // Kosaraju runs on petgraph's stack-based DFS, so long dependency
        // chains don't exhaust the call stack.
        let mut members = kosaraju_scc(inner);
        for component in &mut members {
            component.sort_unstable();
        }
        // Ordering by first member keeps ids stable under unrelated changes.
        members.sort_unstable_by_key(|component| component[0]);

        let mut component_of = vec![ComponentId(0); inner.node_count()];
        for (id, component) in members.iter().enumerate() {
            for node in component {
                component_of[node.index()] = ComponentId(id);
            }
        }

        let cyclic = members
            .iter()
            .map(|component| {
                component.len() > 1 || inner.contains_edge(component[0], component[0])
            })
            .collect();

        Self {
            component_of,
            members,
            cyclic,
        }
    }

    pub fn component_of(&self, node: NodeIndex) -> ComponentId {
        self.component_of[node.index()]
    }

    pub fn members_of(&self, id: ComponentId) -> &[NodeIndex] {
        &self.members[id.0]
    }

    /// Whether the component's members depend on each other.
    ///
    /// True for components with several members and for single classes that
    /// depend on themselves.
    pub fn is_cyclic(&self, id: ComponentId) -> bool {
        self.cyclic[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.members.len()).map(ComponentId)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
