/*!
# Component Partition

Given a spanning tree `T` and a set of *active* nodes (the nodes of degree `k` and `k - 1` that
are still considered), this module computes

- `F`: the tree edges incident to an active node,
- `C`: the connected components of `T` without `F`,
- `H`: the edges of the input graph connecting two different components of `C` without touching
  an active node (the *outer component edges*).

Edges of `H` are exactly the candidates that may be spliced into the tree.

# Example

```rust
use mdst::{algo::*, prelude::*};

// star with center 0 plus the edge (1, 2)
let graph = Graph::<()>::from_edges(4, [(0, 1), (0, 2), (0, 3), (1, 2)]).unwrap();
let tree = Graph::<()>::from_edges(4, [(0, 1), (0, 2), (0, 3)]).unwrap();

let partition = ComponentPartition::compute(&graph, &tree, &[0]).unwrap();
assert_eq!(partition.f.len(), 3);
assert_eq!(partition.number_of_components(), 4);
assert_eq!(partition.outer_component_edges, vec![Edge(1, 2)]);
```
*/

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use super::*;

/// The partition of a spanning tree into components after removing all edges at active nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPartition {
    /// Tree edges incident to an active node (normalized)
    pub f: Vec<Edge>,
    /// Components of the tree without `f`, in discovery order
    pub components: Vec<Vec<Node>>,
    /// Edges of the input graph between two components, not touching an active node (normalized)
    pub outer_component_edges: Vec<Edge>,
    component_of: FxHashMap<Node, usize>,
}

impl ComponentPartition {
    /// Computes `F`, `C` and `H` for `tree` (a spanning tree of `graph`) and the `active` nodes.
    ///
    /// Fails if an active node is missing from the tree.
    pub fn compute<T>(
        graph: &Graph<T>,
        tree: &Graph<T>,
        active: &[Node],
    ) -> Result<Self, AlgorithmError> {
        if let Some(&u) = active.iter().find(|&&u| !tree.has_node(u)) {
            return Err(GraphError::MissingNode(u).into());
        }

        let f = tree
            .adjacent_edges(active.iter().copied())
            .into_iter()
            .map(|e| e.normalized())
            .collect_vec();

        let mut pruned = tree.clone();
        pruned.remove_edges(f.iter().copied())?;

        let components = pruned
            .visited_components()
            .map(|component| component.nodes)
            .collect_vec();

        let component_of = components
            .iter()
            .enumerate()
            .flat_map(|(i, nodes)| nodes.iter().map(move |&u| (u, i)))
            .collect();

        let mut partition = Self {
            f,
            components,
            outer_component_edges: Vec::new(),
            component_of,
        };

        let active: FxHashSet<Node> = active.iter().copied().collect();
        partition.outer_component_edges = graph
            .flat_edges()
            .into_iter()
            .filter(|e| {
                partition.connects_components(*e)
                    && !active.contains(&e.0)
                    && !active.contains(&e.1)
            })
            .collect_vec();

        Ok(partition)
    }

    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }

    /// Index of the component containing `u`
    pub fn component_of(&self, u: Node) -> Option<usize> {
        self.component_of.get(&u).copied()
    }

    /// Returns *true* if both endpoints of `e` lie in different components
    pub fn connects_components(&self, e: Edge) -> bool {
        match (self.component_of(e.0), self.component_of(e.1)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}
