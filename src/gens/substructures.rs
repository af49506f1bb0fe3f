/*!
# Substructure Generators

This module provides utility methods to generate additional **substructures**
inside an already existing graph: **cliques** and **stars**, as used by the presets.

Edges that already exist are kept as they are; missing nodes and self-loops are errors.

# Example

```rust
use mdst::{prelude::*, gens::*};

let mut g = Graph::<()>::from_edges(6, [] as [Edge; 0]).unwrap();
g.connect_clique([0, 1, 2]).unwrap();
g.connect_star(5, [0, 2]).unwrap();

assert_eq!(
    g.ordered_edges(),
    vec![Edge(0, 1), Edge(0, 2), Edge(0, 5), Edge(1, 2), Edge(2, 5)]
);
```
*/

use itertools::Itertools;

use super::*;

/// Trait for creating additional **substructures** (cliques, stars)
/// inside an already existing graph.
pub trait GeneratorSubstructures {
    /// Connects all given nodes into a **clique** (complete subgraph).
    /// Pairs are added in lexicographic order of their positions.
    fn connect_clique<C>(&mut self, nodes: C) -> Result<(), GraphError>
    where
        C: IntoIterator<Item = Node>;

    /// Connects `center` to every node of `leaves`.
    fn connect_star<L>(&mut self, center: Node, leaves: L) -> Result<(), GraphError>
    where
        L: IntoIterator<Item = Node>;
}

impl<G> GeneratorSubstructures for G
where
    G: GraphEdgeEditing,
{
    fn connect_clique<C>(&mut self, nodes: C) -> Result<(), GraphError>
    where
        C: IntoIterator<Item = Node>,
    {
        let nodes = nodes.into_iter().collect_vec();
        for (u, v) in nodes.into_iter().tuple_combinations::<(Node, Node)>() {
            self.try_add_edge(u, v)?;
        }
        Ok(())
    }

    fn connect_star<L>(&mut self, center: Node, leaves: L) -> Result<(), GraphError>
    where
        L: IntoIterator<Item = Node>,
    {
        for v in leaves {
            self.try_add_edge(center, v)?;
        }
        Ok(())
    }
}
