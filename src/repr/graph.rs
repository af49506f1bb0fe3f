use std::{fmt::Debug, sync::Arc};

use fxhash::FxHashMap;
use itertools::Itertools;

use super::*;

/// A node inside the arena: its id, the shared payload and the adjacency of this graph instance
struct Slot<T> {
    id: Node,
    data: Arc<T>,
    nbs: SparseNeighborhood,
}

impl<T> Slot<T> {
    fn copy(&self, clear_edges: bool) -> Self {
        Self {
            id: self.id,
            data: Arc::clone(&self.data),
            nbs: if clear_edges {
                SparseNeighborhood::default()
            } else {
                self.nbs.clone()
            },
        }
    }
}

/// A mutable undirected graph without self-loops and parallel edges.
///
/// Nodes carry caller-assigned ids and a payload of type `T`. The nodes live in a dense arena in
/// insertion order; `index` maps every id to its arena position, so ids may be arbitrary `u32`
/// values and memory only grows with the number of nodes. Iteration over nodes follows their
/// insertion order, iteration over neighborhoods follows the insertion order of edges. Both are
/// preserved by all operations so traversals are reproducible.
pub struct Graph<T = ()> {
    slots: Vec<Slot<T>>,
    index: FxHashMap<Node, usize>,
    num_edges: NumEdges,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: FxHashMap::default(),
            num_edges: 0,
        }
    }
}

impl<T> Clone for Graph<T> {
    fn clone(&self) -> Self {
        self.clone_with(false)
    }
}

impl<T> Debug for Graph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_ids())
            .field("edges", &self.flat_edges())
            .finish()
    }
}

impl<T> Graph<T> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph without edges from `(id, payload)` pairs
    pub fn with_nodes<I>(nodes: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (Node, T)>,
    {
        let mut graph = Self::new();
        graph.add_nodes(nodes)?;
        Ok(graph)
    }

    fn position(&self, u: Node) -> Result<usize, GraphError> {
        self.index.get(&u).copied().ok_or(GraphError::MissingNode(u))
    }

    fn slot(&self, u: Node) -> Result<&Slot<T>, GraphError> {
        let idx = self.position(u)?;
        Ok(&self.slots[idx])
    }

    fn slot_mut(&mut self, u: Node) -> Result<&mut Slot<T>, GraphError> {
        let idx = self.position(u)?;
        Ok(&mut self.slots[idx])
    }

    fn nbs(&self, u: Node) -> &SparseNeighborhood {
        match self.slot(u) {
            Ok(slot) => &slot.nbs,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns the payload of node `u` if it exists
    pub fn data(&self, u: Node) -> Option<&T> {
        self.slot(u).ok().map(|slot| slot.data.as_ref())
    }

    /// Returns *true* if node `u` exists in both graphs and both refer to the same payload,
    /// i.e. one graph was cloned from the other
    pub fn shares_node_with(&self, other: &Self, u: Node) -> bool {
        match (self.slot(u), other.slot(u)) {
            (Ok(a), Ok(b)) => Arc::ptr_eq(&a.data, &b.data),
            _ => false,
        }
    }

    /// Structural copy of the graph. All nodes are retained (sharing their payloads with `self`);
    /// if `clear_edges` is set, the copy has no edges.
    pub fn clone_with(&self, clear_edges: bool) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.copy(clear_edges))
                .collect_vec(),
            index: self.index.clone(),
            num_edges: if clear_edges { 0 } else { self.num_edges },
        }
    }

    /// Returns the ids of all nodes in insertion order
    pub fn node_ids(&self) -> Vec<Node> {
        self.vertices().collect_vec()
    }

    /// Returns every edge exactly once as `(u, v)` with `u < v`
    pub fn flat_edges(&self) -> Vec<Edge> {
        self.edges(true).collect_vec()
    }

    /// Returns the neighbors of `u` as a slice in insertion order
    /// ** Panics if `u` does not exist **
    pub fn neighbors_slice(&self, u: Node) -> &[Node] {
        &self.nbs(u).0
    }
}

impl<T> GraphNodeOrder for Graph<T> {
    fn number_of_nodes(&self) -> NumNodes {
        self.slots.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    fn has_node(&self, u: Node) -> bool {
        self.index.contains_key(&u)
    }
}

impl<T> GraphEdgeOrder for Graph<T> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl<T> AdjacencyList for Graph<T> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.nbs(u).neighbors()
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.nbs(u).num_of_neighbors()
    }
}

impl<T> AdjacencyTest for Graph<T> {
    fn try_has_edge(&self, u: Node, v: Node) -> Result<bool, GraphError> {
        self.slot(v)?;
        Ok(self.slot(u)?.nbs.has_neighbor(v))
    }
}

impl<T> GraphNodeEditing for Graph<T> {
    type Data = T;

    fn add_node(&mut self, u: Node, data: T) -> Result<(), GraphError> {
        if self.has_node(u) {
            return Err(GraphError::DuplicateNode(u));
        }

        self.index.insert(u, self.slots.len());
        self.slots.push(Slot {
            id: u,
            data: Arc::new(data),
            nbs: SparseNeighborhood::default(),
        });
        Ok(())
    }

    fn remove_node(&mut self, u: Node) -> Result<Arc<T>, GraphError> {
        let idx = self.index.remove(&u).ok_or(GraphError::MissingNode(u))?;
        let slot = self.slots.remove(idx);
        // all later nodes moved one position to the front
        for pos in self.index.values_mut() {
            if *pos > idx {
                *pos -= 1;
            }
        }

        for v in slot.nbs.neighbors() {
            let removed = self.slot_mut(v)?.nbs.try_remove_neighbor(u);
            debug_assert!(removed, "adjacency of {u} and {v} is not symmetric");
        }
        self.num_edges -= slot.nbs.num_of_neighbors();

        Ok(slot.data)
    }
}

impl<T> GraphEdgeEditing for Graph<T> {
    fn try_add_edge(&mut self, u: Node, v: Node) -> Result<bool, GraphError> {
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        self.slot(v)?;

        if self.slot_mut(u)?.nbs.try_add_neighbor(v) {
            return Ok(true);
        }
        self.slot_mut(v)?.nbs.add_neighbor(u);
        self.num_edges += 1;
        Ok(false)
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> Result<bool, GraphError> {
        self.slot(v)?;

        if !self.slot_mut(u)?.nbs.try_remove_neighbor(v) {
            return Ok(false);
        }
        let removed = self.slot_mut(v)?.nbs.try_remove_neighbor(u);
        debug_assert!(removed, "adjacency of {u} and {v} is not symmetric");
        self.num_edges -= 1;
        Ok(true)
    }
}

impl<T: Default> GraphFromScratch for Graph<T> {
    fn from_edges<I>(n: NumNodes, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        let mut graph = Self::with_nodes((0..n).map(|u| (u, T::default())))?;
        graph.add_edges(edges)?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Graph {
        Graph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn node_editing() {
        let mut graph: Graph<&str> = Graph::new();
        graph.add_node(7, "seven").unwrap();
        graph.add_node(2, "two").unwrap();
        assert_eq!(
            graph.add_node(7, "again"),
            Err(GraphError::DuplicateNode(7))
        );

        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(graph.vertices().collect_vec(), vec![7, 2]);
        assert_eq!(graph.data(2), Some(&"two"));

        graph.add_edge(7, 2).unwrap();
        assert_eq!(*graph.remove_node(7).unwrap(), "seven");
        assert_eq!(graph.remove_node(7), Err(GraphError::MissingNode(7)));
        assert_eq!(graph.degree_of(2), 0);
        assert_eq!(graph.number_of_edges(), 0);
        assert_eq!(graph.vertices().collect_vec(), vec![2]);
    }

    #[test]
    fn sparse_ids() {
        let mut graph: Graph<&str> = Graph::new();
        graph.add_node(0, "first").unwrap();
        graph.add_node(3_000_000_000, "far").unwrap();
        graph.add_node(Node::MAX - 1, "last").unwrap();
        graph.add_edge(0, 3_000_000_000).unwrap();
        graph.add_edge(Node::MAX - 1, 3_000_000_000).unwrap();

        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.vertices().collect_vec(), vec![0, 3_000_000_000, Node::MAX - 1]);
        assert_eq!(graph.degree_of(3_000_000_000), 2);
        assert_eq!(graph.data(3_000_000_000), Some(&"far"));
        assert!(!graph.has_node(1));

        let copy = graph.clone_with(true);
        assert!(copy.shares_node_with(&graph, Node::MAX - 1));
        assert_eq!(copy.number_of_edges(), 0);

        assert_eq!(*graph.remove_node(3_000_000_000).unwrap(), "far");
        assert_eq!(graph.number_of_edges(), 0);
        assert_eq!(graph.vertices().collect_vec(), vec![0, Node::MAX - 1]);
    }

    #[test]
    fn edge_editing_errors() {
        let mut graph = square();
        assert_eq!(graph.add_edge(1, 1), Err(GraphError::SelfLoop(1)));
        assert_eq!(graph.add_edge(1, 9), Err(GraphError::MissingNode(9)));
        assert_eq!(graph.add_edge(9, 1), Err(GraphError::MissingNode(9)));
        assert_eq!(graph.add_edge(1, 0), Err(GraphError::DuplicateEdge(Edge(1, 0))));
        assert_eq!(graph.remove_edge(0, 2), Err(GraphError::MissingEdge(Edge(0, 2))));
        assert_eq!(graph.try_remove_edge(0, 2), Ok(false));
        assert_eq!(graph.remove_edge(0, 9), Err(GraphError::MissingNode(9)));
        assert_eq!(graph.try_has_edge(0, 9), Err(GraphError::MissingNode(9)));
        assert!(!graph.has_edge(0, 9));
    }

    #[test]
    fn add_remove_round_trip() {
        let mut graph = square();
        let degrees = graph.degrees().collect_vec();

        graph.add_edge(0, 2).unwrap();
        assert!(graph.has_edge(2, 0));
        assert_eq!(graph.number_of_edges(), 5);

        graph.remove_edge(2, 0).unwrap();
        assert!(!graph.has_edge(0, 2));
        assert_eq!(graph.degrees().collect_vec(), degrees);
        assert_eq!(graph.number_of_edges(), 4);
    }

    #[test]
    fn symmetric_adjacency() {
        let graph = Graph::<()>::from_edges(5, [(0, 1), (0, 2), (3, 0), (4, 3)]).unwrap();
        for u in graph.vertices() {
            for v in graph.neighbors_of(u) {
                assert!(graph.neighbors_of(v).contains(&u));
            }
        }
        assert_eq!(graph.neighbors_slice(0), &[1, 2, 3]);
    }

    #[test]
    fn degree_queries() {
        let graph = Graph::<()>::from_edges(5, [(0, 1), (0, 2), (0, 3), (3, 4)]).unwrap();
        assert_eq!(graph.max_degree(), 3);
        assert_eq!(graph.max_degree(), 3);
        assert_eq!(graph.vertices_of_degree(1), vec![1, 2, 4]);
        assert_eq!(graph.vertices_of_degree(1), graph.vertices_of_degree(1));

        let isolated = Graph::with_nodes([(0, ()), (1, ())]).unwrap();
        assert_eq!(isolated.max_degree(), 0);
        assert_eq!(Graph::<()>::new().max_degree(), 0);
    }

    #[test]
    fn adjacent_and_flat_edges() {
        let graph = Graph::<()>::from_edges(5, [(0, 1), (2, 0), (1, 2), (3, 4)]).unwrap();
        assert_eq!(
            graph.flat_edges(),
            vec![Edge(0, 1), Edge(0, 2), Edge(1, 2), Edge(3, 4)]
        );

        let adjacent = graph.adjacent_edges([0, 1]);
        assert_eq!(adjacent.len(), 3);
        let mut normalized = adjacent.iter().map(Edge::normalized).collect_vec();
        normalized.sort();
        assert_eq!(normalized, vec![Edge(0, 1), Edge(0, 2), Edge(1, 2)]);

        assert!(graph.adjacent_edges([]).is_empty());
    }

    #[test]
    fn clone_isolation() {
        let graph = square();
        let mut copy = graph.clone();
        copy.remove_edge(0, 1).unwrap();
        copy.add_edge(0, 2).unwrap();

        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(0, 2));
        assert_eq!(graph.number_of_edges(), 4);
        assert!(graph.shares_node_with(&copy, 0));
        assert!(!graph.shares_node_with(&square(), 0));
    }

    #[test]
    fn clone_without_edges() {
        let graph = square();
        let blank = graph.clone_with(true);
        assert_eq!(blank.number_of_nodes(), 4);
        assert_eq!(blank.number_of_edges(), 0);
        assert_eq!(blank.vertices().collect_vec(), graph.vertices().collect_vec());
        assert!((0..4).all(|u| blank.shares_node_with(&graph, u)));
    }
}
