//! Find cycles for reporting them to the user.
//!
//! Cycles are not an error. The sorter copes with them just fine, but they
//! usually hint at a mistake in the declarations, so it is worth telling
//! someone about them.

use std::fmt;

use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};

use crate::ClassGraph;

/// A closed path through the graph.
///
/// Each class depends on the next one, and the last class depends on the
/// first. A class depending on itself is a cycle of length one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle(Vec<String>);

impl Cycle {
    pub fn classes(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("-"))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Unvisited,
    OnPath,
    Done,
}

/// Neighbors of a node, reversed so that popping yields ascending indices.
fn pending(graph: &DiGraph<String, ()>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut neighbors = graph.neighbors(node).collect::<Vec<_>>();
    neighbors.sort_unstable_by(|a, b| b.cmp(a));
    neighbors
}

/// Find any one cycle using a depth-first search without recursion.
fn find_cycle(graph: &DiGraph<String, ()>) -> Option<Vec<NodeIndex>> {
    let mut state = vec![State::Unvisited; graph.node_count()];

    for start in graph.node_indices() {
        if state[start.index()] != State::Unvisited {
            continue;
        }

        state[start.index()] = State::OnPath;
        let mut path = vec![(start, pending(graph, start))];
        loop {
            let Some((node, neighbors)) = path.last_mut() else {
                break;
            };
            let node = *node;

            let Some(next) = neighbors.pop() else {
                state[node.index()] = State::Done;
                path.pop();
                continue;
            };

            match state[next.index()] {
                State::Unvisited => {
                    state[next.index()] = State::OnPath;
                    path.push((next, pending(graph, next)));
                }
                State::OnPath => {
                    let from = path.iter().position(|(n, _)| *n == next)?;
                    return Some(path[from..].iter().map(|(n, _)| *n).collect());
                }
                State::Done => {}
            }
        }
    }

    None
}

/// All cycles of the graph, for diagnostics.
///
/// Works on a copy of the graph: one cycle is found and its edges removed,
/// then the next one, until no cycle is left. Which cycles are found depends on
/// the search, so when cycles share edges, not every way around them is
/// reported. The graph itself is not modified.
pub fn find_cycles(graph: &ClassGraph) -> Vec<Cycle> {
    let inner = graph.inner();
    if toposort(inner, None).is_ok() {
        return vec![];
    }

    let mut remaining = inner.clone();
    let mut cycles = vec![];
    while let Some(path) = find_cycle(&remaining) {
        for (i, &from) in path.iter().enumerate() {
            let to = path[(i + 1) % path.len()];
            if let Some(edge) = remaining.find_edge(from, to) {
                remaining.remove_edge(edge);
            }
        }
        cycles.push(Cycle(path.into_iter().map(|n| inner[n].clone()).collect()));
    }
    cycles
}
