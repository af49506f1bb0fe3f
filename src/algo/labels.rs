/*!
# Labelled Nodes

A node of degree `k - 1` that lies on the cycle of an outer component edge without any node of
degree `k` cannot be reduced right away. Instead it is *labelled*: we remember the edge that
closes its cycle together with the cycle neighbor whose edge would be dropped. The stored
(deferred) move is applied once a later local move would raise the labelled node to degree `k`.

Applying a deferred move adds an edge, which may in turn hit another labelled node; hence moves
are resolved through a queue until no labelled endpoint remains. Every label is consumed at most
once.
*/

use std::collections::VecDeque;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::trace;

use super::*;

/// A move that was deferred when a node got labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredMove {
    /// Cycle neighbor of the labelled node; the edge towards it will be removed
    pub neighbor: Node,
    /// Outer component edge closing the cycle; it will be added
    pub edge: Edge,
}

/// The labelled nodes of the current sequence of subphases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelledNodes {
    labels: FxHashMap<Node, DeferredMove>,
}

impl LabelledNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_labelled(&self, u: Node) -> bool {
        self.labels.contains_key(&u)
    }

    pub fn get(&self, u: Node) -> Option<&DeferredMove> {
        self.labels.get(&u)
    }

    /// Labels `u`, replacing an earlier deferred move of `u`
    pub fn label(&mut self, u: Node, deferred: DeferredMove) {
        self.labels.insert(u, deferred);
    }

    /// Removes the label of `u` and returns its deferred move
    pub fn unlabel(&mut self, u: Node) -> Option<DeferredMove> {
        self.labels.remove(&u)
    }

    /// Returns the ids of all labelled nodes in ascending order
    pub fn ids(&self) -> Vec<Node> {
        self.labels.keys().copied().sorted().collect()
    }

    /// Resolves the deferred moves of all labelled nodes reachable from `seeds`.
    ///
    /// Starting with `seeds` (the endpoints of an edge about to be added), every labelled node
    /// taken from the queue applies its deferred move to `tree`: the stored edge is added and the
    /// edge towards the stored neighbor is removed. The endpoints of the added edge are queued in
    /// turn. The stored neighbor is validated against the cycle the stored edge closes in the
    /// *current* tree; if it is no longer adjacent there, the cycle successor of the node is used.
    /// A deferred move whose edge is already part of the tree, or whose node is no longer on the
    /// cycle, is dropped without changing the tree.
    ///
    /// Returns one [`PropagatedMove`] per applied move, in the order they were applied.
    /// `tree` remains a spanning tree.
    pub fn cascade<T, I>(
        &mut self,
        tree: &mut Graph<T>,
        seeds: I,
    ) -> Result<Vec<PropagatedMove>, AlgorithmError>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut queue: VecDeque<Node> = seeds.into_iter().collect();
        let mut moves = Vec::new();

        while let Some(u) = queue.pop_front() {
            let Some(deferred) = self.unlabel(u) else {
                continue;
            };
            let Edge(a, b) = deferred.edge;

            if tree.try_add_edge(a, b)? {
                trace!(node = u, edge = %deferred.edge, "deferred edge already in tree");
                continue;
            }

            let cycle = tree.find_cycle(a)?;
            let neighbor = if cycle.are_adjacent(u, deferred.neighbor) {
                deferred.neighbor
            } else if cycle.contains(u) {
                cycle.successor(u)?
            } else {
                tree.remove_edge(a, b)?;
                trace!(node = u, edge = %deferred.edge, "labelled node left the cycle");
                continue;
            };

            tree.remove_edge(u, neighbor)?;
            queue.extend([a, b]);

            let removed = Edge(u, neighbor).normalized();
            trace!(node = u, added = %deferred.edge, removed = %removed, "propagated move");

            moves.push(PropagatedMove {
                node_id: u,
                added_edge: deferred.edge.normalized(),
                removed_edge: removed,
                edges_in_tree_after: tree.ordered_edges(),
            });
        }

        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    // tree:  0 - 1 - 2 - 3 - 4      graph adds (0, 2), (2, 4), (0, 4)
    fn path() -> Graph {
        graph_from(5, [(0, 1), (1, 2), (2, 3), (3, 4)])
    }

    #[test]
    fn labelling() {
        let mut labels = LabelledNodes::new();
        assert!(labels.is_empty());

        let deferred = DeferredMove {
            neighbor: 2,
            edge: Edge(0, 2),
        };
        labels.label(1, deferred);
        labels.label(3, deferred);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.ids(), vec![1, 3]);
        assert_eq!(labels.get(1), Some(&deferred));

        assert_eq!(labels.unlabel(1), Some(deferred));
        assert_eq!(labels.unlabel(1), None);
        assert!(!labels.is_labelled(1));
        assert!(labels.is_labelled(3));
    }

    #[test]
    fn no_labelled_seed() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        labels.label(
            1,
            DeferredMove {
                neighbor: 2,
                edge: Edge(0, 2),
            },
        );

        let moves = labels.cascade(&mut tree, [3, 4]).unwrap();
        assert!(moves.is_empty());
        assert_eq!(tree.ordered_edges(), path().ordered_edges());
        assert!(labels.is_labelled(1));
    }

    #[test]
    fn single_propagation() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        labels.label(
            1,
            DeferredMove {
                neighbor: 2,
                edge: Edge(0, 2),
            },
        );

        let moves = labels.cascade(&mut tree, [1, 9]).unwrap();
        assert_eq!(
            moves,
            vec![PropagatedMove {
                node_id: 1,
                added_edge: Edge(0, 2),
                removed_edge: Edge(1, 2),
                edges_in_tree_after: vec![Edge(0, 1), Edge(0, 2), Edge(2, 3), Edge(3, 4)],
            }]
        );
        assert!(labels.is_empty());
        assert_eq!(tree.degree_of(1), 1);
    }

    #[test]
    fn chained_propagation() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        // applying 1's move adds (0, 2), which hits the labelled node 2
        labels.label(
            1,
            DeferredMove {
                neighbor: 2,
                edge: Edge(0, 2),
            },
        );
        labels.label(
            2,
            DeferredMove {
                neighbor: 3,
                edge: Edge(2, 4),
            },
        );

        let moves = labels.cascade(&mut tree, [1]).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].node_id, 1);
        assert_eq!(moves[1].node_id, 2);
        assert_eq!(moves[1].added_edge, Edge(2, 4));
        assert_eq!(moves[1].removed_edge, Edge(2, 3));
        assert_eq!(
            tree.ordered_edges(),
            vec![Edge(0, 1), Edge(0, 2), Edge(2, 4), Edge(3, 4)]
        );
        assert_eq!(moves[1].edges_in_tree_after, tree.ordered_edges());
        assert!(labels.is_empty());
    }

    #[test]
    fn stale_neighbor_is_replaced() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        // (1, 0) is not on the cycle closed by (2, 4)
        labels.label(
            3,
            DeferredMove {
                neighbor: 1,
                edge: Edge(2, 4),
            },
        );

        let moves = labels.cascade(&mut tree, [3]).unwrap();
        assert_eq!(moves.len(), 1);
        assert!(moves[0].removed_edge.touches(3));
        assert_eq!(tree.number_of_edges(), 4);
        assert_eq!(tree.degree_of(3), 1);
    }

    #[test]
    fn deferred_edge_already_present() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        labels.label(
            2,
            DeferredMove {
                neighbor: 1,
                edge: Edge(3, 4),
            },
        );

        let moves = labels.cascade(&mut tree, [2]).unwrap();
        assert!(moves.is_empty());
        assert_eq!(tree.ordered_edges(), path().ordered_edges());
        assert!(labels.is_empty());
    }

    #[test]
    fn node_off_the_cycle_is_dropped() {
        let mut tree = path();
        let mut labels = LabelledNodes::new();
        labels.label(
            0,
            DeferredMove {
                neighbor: 1,
                edge: Edge(2, 4),
            },
        );

        let moves = labels.cascade(&mut tree, [0]).unwrap();
        assert!(moves.is_empty());
        assert_eq!(tree.ordered_edges(), path().ordered_edges());
    }
}
