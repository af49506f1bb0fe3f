/*!
Graph traversal algorithms and traversal-derived utilities.

This module provides:
- Generic breadth-first traversal iterators, with and without predecessor tracking.
- A partition of the whole node set into connected components, where each component also
  reports the edges that were actually traversed (a spanning forest of the graph).
- A high-level `Traversal` trait that exposes traversal algorithms
  directly as methods on graph data structures.

Traversals are deterministic: starting nodes are taken in node insertion order and neighbors
are explored in adjacency insertion order.
*/

use super::*;
use fxhash::FxHashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, marker::PhantomData};

/// Abstraction for items yielded by a traversal iterator.
///
/// A `SequencedItem` encodes both the **node currently visited**
/// and an **optional predecessor** that represents its parent
/// in the traversal tree.
pub trait SequencedItem: Clone + Copy {
    /// Constructs a new item with a predecessor.
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self;

    /// Constructs a new item without predecessor information.
    fn new_without_predecessor(item: Node) -> Self;

    /// Returns the node represented by this item.
    fn item(&self) -> Node;

    /// Returns the predecessor of this node, if any.
    fn predecessor(&self) -> Option<Node>;
}

impl SequencedItem for Node {
    fn new_with_predecessor(_: Node, item: Node) -> Self {
        item
    }
    fn new_without_predecessor(item: Node) -> Self {
        item
    }
    fn item(&self) -> Node {
        *self
    }
    fn predecessor(&self) -> Option<Node> {
        None
    }
}

/// Compact representation of `(predecessor, node)` used for
/// traversals with parent tracking.
///
/// Internally, the absence of a predecessor is encoded by
/// setting both tuple entries to the same node value.
pub type PredecessorOfNode = (Node, Node);

impl SequencedItem for PredecessorOfNode {
    fn new_with_predecessor(predecessor: Node, item: Node) -> Self {
        (predecessor, item)
    }
    fn new_without_predecessor(item: Node) -> Self {
        (item, item)
    }
    fn item(&self) -> Node {
        self.1
    }
    fn predecessor(&self) -> Option<Node> {
        if self.0 == self.1 { None } else { Some(self.0) }
    }
}

/// Abstraction for the traversal frontier data structure.
/// [`VecDeque`] gives queue semantics and thereby a **BFS**.
pub trait NodeSequencer<T> {
    /// Creates a new sequencer initialized with a single node.
    fn init(u: T) -> Self;

    /// Pushes a node into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    fn init(u: T) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Generic traversal iterator over a [`NodeSequencer`] frontier.
///
/// Maintains an explicit "frontier" (queue or stack) of nodes to visit and a set of discovered
/// nodes. Nodes are marked as discovered when they are pushed, so every node is yielded once.
pub struct TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    graph: &'a G,
    visited: FxHashSet<Node>,
    sequencer: S,
    _item: PhantomData<I>,
}

/// A BFS traversal iterator over the graph, visiting nodes in
/// breadth-first order from a given starting node.
pub type BFS<'a, G> = TraversalSearch<'a, G, VecDeque<Node>, Node>;

/// A BFS traversal iterator that records predecessor information,
/// producing a spanning tree of the search.
pub type BFSWithPredecessor<'a, G> =
    TraversalSearch<'a, G, VecDeque<PredecessorOfNode>, PredecessorOfNode>;

impl<G, S, I> Iterator for TraversalSearch<'_, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.sequencer.pop()?;
        let u = popped.item();

        for v in self.graph.neighbors_of(u) {
            if self.visited.insert(v) {
                self.sequencer.push(I::new_with_predecessor(u, v));
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.sequencer.cardinality(),
            Some(self.graph.len() - self.visited.len() + self.sequencer.cardinality()),
        )
    }
}

impl<'a, G, S, I> TraversalSearch<'a, G, S, I>
where
    G: AdjacencyList,
    S: NodeSequencer<I>,
    I: SequencedItem,
{
    /// Creates a new traversal iterator starting from `start`.
    /// ** Panics if `start` does not exist **
    pub fn new(graph: &'a G, start: Node) -> Self {
        assert!(graph.has_node(start), "start node {start} does not exist");
        let mut visited = FxHashSet::default();
        visited.insert(start);
        Self {
            graph,
            visited,
            sequencer: S::init(I::new_without_predecessor(start)),
            _item: PhantomData,
        }
    }

    /// Tries to restart the search at the first (in insertion order) yet unvisited node and
    /// returns true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert_eq!(self.sequencer.cardinality(), 0);
        match self.graph.vertices().find(|u| !self.visited.contains(u)) {
            None => false,
            Some(x) => {
                self.visited.insert(x);
                self.sequencer.push(I::new_without_predecessor(x));
                true
            }
        }
    }
}

/// A connected component as discovered by a breadth-first search: its nodes in visiting order
/// and the edges `(predecessor, node)` that were used to reach them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisitedComponent {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Iterator over the connected components of a graph, see [`Traversal::visited_components`]
pub struct VisitedComponents<'a, G>
where
    G: AdjacencyList,
{
    bfs: Option<BFSWithPredecessor<'a, G>>,
}

impl<G> Iterator for VisitedComponents<'_, G>
where
    G: AdjacencyList,
{
    type Item = VisitedComponent;

    fn next(&mut self) -> Option<Self::Item> {
        let bfs = self.bfs.as_mut()?;

        let mut component = VisitedComponent::default();
        for item in bfs.by_ref() {
            component.nodes.push(item.item());
            if let Some(pred) = item.predecessor() {
                component.edges.push(Edge(pred, item.item()));
            }
        }

        if !bfs.try_restart_at_unvisited() {
            self.bfs = None;
        }

        Some(component)
    }
}

/// Traversal algorithms exposed as methods on graphs
pub trait Traversal: AdjacencyList + Sized {
    /// Returns an iterator traversing nodes in breadth-first-search ordering
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns an iterator traversing nodes in breadth-first-search ordering together with the
    /// node they were discovered from
    fn bfs_with_predecessor(&self, start: Node) -> BFSWithPredecessor<'_, Self> {
        BFSWithPredecessor::new(self, start)
    }

    /// Partitions the full node set into connected components.
    /// Components are started at the first unvisited node in insertion order; for each
    /// component the nodes in visiting order and the traversed tree edges are reported.
    fn visited_components(&self) -> VisitedComponents<'_, Self> {
        VisitedComponents {
            bfs: self.vertices().next().map(|start| self.bfs_with_predecessor(start)),
        }
    }

    /// Collects [`Traversal::visited_components`]
    fn breadth_first_search(&self) -> Vec<VisitedComponent> {
        self.visited_components().collect_vec()
    }

    /// Returns *true* if the graph is non-empty and connected
    fn is_connected(&self) -> bool {
        match self.vertices().next() {
            None => false,
            Some(start) => self.bfs(start).count() == self.len(),
        }
    }
}

impl<G> Traversal for G where G: AdjacencyList + Sized {}
