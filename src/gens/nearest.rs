use serde::{Deserialize, Serialize};

use super::*;

/// A point in the plane at which a node is drawn
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between both points
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Connects every node embedded in the plane to its `n` nearest other nodes.
///
/// Candidates are ranked by Euclidean distance; on ties the node that appears earlier in the
/// position list wins. Edges that are already present are skipped, so connecting twice is a no-op.
///
/// ```
/// use mdst::{prelude::*, gens::*};
///
/// let positions = [
///     (0, Position::new(0.0, 0.0)),
///     (1, Position::new(1.0, 0.0)),
///     (2, Position::new(5.0, 0.0)),
/// ];
/// let mut g = Graph::<()>::from_edges(3, [] as [Edge; 0]).unwrap();
///
/// assert_eq!(ConnectNearest::new(1).connect(&mut g, &positions).unwrap(), 2);
/// assert_eq!(g.ordered_edges(), vec![Edge(0, 1), Edge(1, 2)]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ConnectNearest {
    n: usize,
}

impl ConnectNearest {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Updates the number of neighbors every node is connected to
    pub fn neighbors(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Returns the up to `n` nodes closest to `u`, closest first
    pub fn nearest_of(&self, u: Node, positions: &[(Node, Position)]) -> Vec<Node> {
        let Some(last) = self.n.checked_sub(1) else {
            return Vec::new();
        };
        let Some(origin) = positions.iter().find(|(v, _)| *v == u).map(|(_, p)| *p) else {
            return Vec::new();
        };

        let mut nearest: Vec<(f64, Option<Node>)> = vec![(f64::INFINITY, None); self.n];
        for &(v, pos) in positions {
            if v == u {
                continue;
            }

            let distance = origin.distance(&pos);
            if nearest[last].0 > distance {
                nearest[last] = (distance, Some(v));

                // bubble up; equal distances keep the earlier node in front
                for i in (1..=last).rev() {
                    if nearest[i].0 >= nearest[i - 1].0 {
                        break;
                    }
                    nearest.swap(i, i - 1);
                }
            }
        }

        nearest.into_iter().filter_map(|(_, v)| v).collect()
    }

    /// Returns all candidate edges `Edge(u, v)` for every node `u` in order of `positions`.
    /// An undirected edge may be reported from both of its endpoints.
    pub fn edges(&self, positions: &[(Node, Position)]) -> Vec<Edge> {
        positions
            .iter()
            .flat_map(|&(u, _)| {
                self.nearest_of(u, positions)
                    .into_iter()
                    .map(move |v| Edge(u, v))
            })
            .collect()
    }

    /// Inserts the candidate edges into `graph` and returns the number of edges that were new.
    /// Fails if a positioned node does not exist in `graph`.
    pub fn connect<G>(
        &self,
        graph: &mut G,
        positions: &[(Node, Position)],
    ) -> Result<NumEdges, GraphError>
    where
        G: GraphEdgeEditing,
    {
        let mut added = 0;
        for Edge(u, v) in self.edges(positions) {
            if !graph.try_add_edge(u, v)? {
                added += 1;
            }
        }
        Ok(added)
    }
}
