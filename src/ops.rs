use std::sync::Arc;

use fxhash::FxHashSet;
use itertools::Itertools;

use crate::*;

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V in insertion order.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns *true* if a node with id `u` exists
    fn has_node(&self, u: Node) -> bool;

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over the (open) neighborhood of a given vertex in the order the
    /// edges were inserted.
    /// ** Panics if `u` does not exist **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns the number of neighbors of `u`
    /// ** Panics if `u` does not exist **
    fn degree_of(&self, u: Node) -> NumNodes;

    /// Returns an iterator over the degrees of all nodes in insertion order
    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.degree_of(u))
    }

    /// Returns the maximum degree in the graph; `0` for a graph without edges
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    /// Returns all nodes whose degree is exactly `k` in insertion order
    fn vertices_of_degree(&self, k: NumNodes) -> Vec<Node> {
        self.vertices()
            .filter(|&u| self.degree_of(u) == k)
            .collect_vec()
    }

    /// Returns an iterator over the edges incident to a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u < v` are considered.
    /// ** Panics if `u` does not exist **
    fn edges_of(&self, u: Node, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors_of(u)
            .map(move |v| Edge(u, v))
            .filter(move |e| !only_normalized || e.is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, every undirected edge is reported exactly once as `(u, v)` with
    /// `u < v`.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }

    /// Returns all normalized edges in sorted order
    fn ordered_edges(&self) -> Vec<Edge> {
        let mut edges = self.edges(true).collect_vec();
        edges.sort_unstable();
        edges
    }

    /// Returns all edges touching at least one of the given nodes.
    /// Every edge is reported once, independent of which endpoint was requested.
    /// ** Panics if any of `nodes` does not exist **
    fn adjacent_edges<I>(&self, nodes: I) -> Vec<Edge>
    where
        I: IntoIterator<Item = Node>,
    {
        let requested: FxHashSet<Node> = nodes.into_iter().collect();
        let mut seen = FxHashSet::default();

        self.vertices()
            .flat_map(|u| self.edges_of(u, false))
            .filter(|e| requested.contains(&e.1) && seen.insert(e.normalized()))
            .collect_vec()
    }
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the egde (u,v) exists in the graph.
    /// Fails if `u` or `v` does not exist.
    fn try_has_edge(&self, u: Node, v: Node) -> Result<bool, GraphError>;

    /// Returns *true* if the egde (u,v) exists in the graph.
    /// Missing nodes are treated as having no edges.
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.try_has_edge(u, v).unwrap_or(false)
    }
}

/// Provides functions to insert/delete nodes
pub trait GraphNodeEditing {
    /// Payload stored alongside every node
    type Data;

    /// Adds a node with id `u` carrying `data`.
    /// Fails if a node with that id already exists.
    fn add_node(&mut self, u: Node, data: Self::Data) -> Result<(), GraphError>;

    /// Adds all nodes in the collection
    fn add_nodes<I>(&mut self, nodes: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (Node, Self::Data)>,
    {
        for (u, data) in nodes {
            self.add_node(u, data)?;
        }
        Ok(())
    }

    /// Removes node `u` together with all incident edges and returns its payload.
    /// Fails if the node does not exist.
    fn remove_node(&mut self, u: Node) -> Result<Arc<Self::Data>, GraphError>;
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing {
    /// Adds the edge `(u, v)` to the graph.
    /// Returns *true* exactly if the edge was present previously, in which case nothing changes.
    /// Fails on self-loops and if `u` or `v` does not exist.
    fn try_add_edge(&mut self, u: Node, v: Node) -> Result<bool, GraphError>;

    /// Adds the edge *(u,v)* to the graph.
    /// Fails on self-loops, missing endpoints, and if the edge was already present.
    fn add_edge(&mut self, u: Node, v: Node) -> Result<(), GraphError> {
        if self.try_add_edge(u, v)? {
            Err(GraphError::DuplicateEdge(Edge(u, v)))
        } else {
            Ok(())
        }
    }

    /// Adds all edges in the collection
    fn add_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        for Edge(u, v) in edges.into_iter().map(|e| e.into()) {
            self.add_edge(u, v)?;
        }
        Ok(())
    }

    /// Removes the edge *(u,v)* from the graph.
    /// If the edge was removed, returns *true* and *false* otherwise.
    /// Fails if `u` or `v` does not exist.
    fn try_remove_edge(&mut self, u: Node, v: Node) -> Result<bool, GraphError>;

    /// Removes the edge *(u,v)* from the graph.
    /// Fails if `u` or `v` does not exist or if the edge is not present.
    fn remove_edge(&mut self, u: Node, v: Node) -> Result<(), GraphError> {
        if self.try_remove_edge(u, v)? {
            Ok(())
        } else {
            Err(GraphError::MissingEdge(Edge(u, v)))
        }
    }

    /// Removes all edges in the collection
    fn remove_edges<I>(&mut self, edges: I) -> Result<(), GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        for Edge(u, v) in edges.into_iter().map(|e| e.into()) {
            self.remove_edge(u, v)?;
        }
        Ok(())
    }
}

/// A super trait for creating a graph from scratch from a set of edges and a number of nodes
pub trait GraphFromScratch: Sized {
    /// Create a graph with nodes `0..n` and the given edges
    fn from_edges<I>(n: NumNodes, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Edge>;
}
