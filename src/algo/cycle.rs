/*!
# Cycle Search

Finds the cycle that is closed when a single edge is added to a tree. The search is a
depth-first walk with an explicit stack: it descends into the first unvisited neighbor, backtracks
when there is none, and stops as soon as the node on top of the stack is adjacent to the start
node while the stack holds more than two nodes. The stack then *is* the cycle, in walking order.
*/

use fxhash::FxHashSet;
use itertools::Itertools;

use super::*;

/// An ordered cycle; the last node is adjacent to the first one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    nodes: Vec<Node>,
}

impl Cycle {
    /// Nodes of the cycle in walking order, starting at the search start
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, u: Node) -> bool {
        self.nodes.contains(&u)
    }

    pub fn position(&self, u: Node) -> Option<usize> {
        self.nodes.iter().position(|&x| x == u)
    }

    /// Returns the node following `u` in walking order (wrapping around).
    /// Fails if `u` is not on the cycle.
    pub fn successor(&self, u: Node) -> Result<Node, AlgorithmError> {
        let pos = self.position(u).ok_or(AlgorithmError::NotOnCycle(u))?;
        Ok(self.nodes[(pos + 1) % self.len()])
    }

    /// Returns the node preceding `u` in walking order (wrapping around).
    /// Fails if `u` is not on the cycle.
    pub fn predecessor(&self, u: Node) -> Result<Node, AlgorithmError> {
        let pos = self.position(u).ok_or(AlgorithmError::NotOnCycle(u))?;
        Ok(self.nodes[(pos + self.len() - 1) % self.len()])
    }

    /// Returns *true* if `(u, v)` is one of the edges of the cycle
    pub fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.successor(u).is_ok_and(|x| x == v) || self.predecessor(u).is_ok_and(|x| x == v)
    }

    /// Edges of the cycle in walking order, normalized
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .copied()
            .circular_tuple_windows()
            .map(|(u, v)| Edge(u, v).normalized())
            .collect_vec()
    }
}

/// Cycle search on graphs with (at least) one cycle through a given node
pub trait CycleFinder: AdjacencyList {
    /// Returns a cycle through `start`.
    /// On a tree with a single additional edge `{start, x}` this is the unique cycle.
    ///
    /// Fails if `start` does not exist or no cycle through `start` is found.
    fn find_cycle(&self, start: Node) -> Result<Cycle, AlgorithmError> {
        if !self.has_node(start) {
            return Err(AlgorithmError::CycleStartMissing(start));
        }

        let mut stack = vec![start];
        let mut visited = FxHashSet::default();
        visited.insert(start);

        'search: while let Some(&top) = stack.last() {
            for v in self.neighbors_of(top) {
                if v == start && stack.len() > 2 {
                    return Ok(Cycle { nodes: stack });
                }
                if visited.insert(v) {
                    stack.push(v);
                    continue 'search;
                }
            }
            stack.pop();
        }

        Err(AlgorithmError::CycleNotFound(start))
    }
}

impl<G: AdjacencyList> CycleFinder for G {}
