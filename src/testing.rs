//! Helpers shared by the unit tests of several modules

use itertools::Itertools;
use rand::Rng;

use crate::{algo::Traversal, prelude::*};

/// Creates a connected graph on nodes `0..n`: a random recursive tree plus every other pair
/// with probability `p`
pub fn random_connected_graph<R: Rng>(rng: &mut R, n: NumNodes, p: f64) -> Graph {
    let mut graph = Graph::with_nodes((0..n).map(|u| (u, ()))).unwrap();
    for v in 1..n {
        let u = rng.random_range(0..v);
        graph.add_edge(u, v).unwrap();
    }

    for (u, v) in (0..n).tuple_combinations::<(Node, Node)>() {
        if rng.random_bool(p) {
            graph.try_add_edge(u, v).unwrap();
        }
    }

    graph
}

/// Asserts that `tree` is a spanning tree of `graph`
pub fn assert_spanning_tree<T>(graph: &Graph<T>, tree: &Graph<T>) {
    assert_eq!(
        tree.vertices().sorted().collect_vec(),
        graph.vertices().sorted().collect_vec()
    );
    assert_eq!(tree.number_of_nodes(), tree.number_of_edges() + 1);
    assert!(tree.is_connected(), "tree is not connected: {tree:?}");

    for Edge(u, v) in tree.edges(true) {
        assert!(graph.has_edge(u, v), "tree edge ({u},{v}) not in graph");
    }
}

/// Builds a graph carrying nodes `0..n` and the given edges; shorthand for tests
pub fn graph_from<I>(n: NumNodes, edges: I) -> Graph
where
    I: IntoIterator,
    I::Item: Into<Edge>,
{
    Graph::from_edges(n, edges).unwrap()
}
