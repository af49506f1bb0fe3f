/*!
`mdst` reduces the maximum node degree of a spanning tree by a sequence of *local moves* and
records every intermediate state so the run can be replayed step by step.

# Representation

We represent **nodes** as `u32` ids assigned by the caller; ids are unique but need not be dense.
For **edges**, we use a simple tuple-struct `Edge(Node, Node)`. All graphs are **undirected**:
`Edge(u, v)` is treated as equivalent to `Edge(v, u)`, and edges are normalized (smaller id
first) whenever they are stored in a history or compared.

The single storage backend is [`Graph`](crate::repr::Graph), an arena of nodes with
insertion-ordered adjacency lists. Its capabilities are expressed via the traits in [`ops`].

# Algorithm

Given a connected graph, [`DegreeReduction`](crate::algo::DegreeReduction) computes an arbitrary
spanning tree via breadth-first search and then works in *phases*, one per target maximum degree
`k`. Inside a phase, the edges `F` incident to nodes of degree `k` and `k - 1` are removed from the
tree, the remaining components `C` are computed, and edges of the input graph connecting two
components (`H`) are spliced in one after another. An edge whose cycle contains a node of degree
`k` reduces that node's degree (a local move); otherwise the degree `k - 1` nodes on the cycle are
labelled and their moves are deferred until they have to be propagated.

```
use mdst::prelude::*;

let k5 = (0..5).flat_map(|u| (u + 1..5).map(move |v| (u, v)));
let graph = Graph::<()>::from_edges(5, k5).unwrap();
let output = DegreeReduction::new().run(&graph).unwrap();

assert!(output.stats.final_max_node_degree <= output.stats.initial_max_node_degree);
assert!(output.history.phases.last().unwrap().subphases.last().unwrap().is_finished());
```

# Usage

- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, the graph
  representation, the algorithm and its history types,
- [`algo`] includes traversal, cycle search, component partitioning and the degree reduction,
- [`history`] and [`playback`] describe the recorded run and a debugger-like cursor over it,
- [`gens`] includes the preset graphs and random generators,
- [`io`] includes the JSON export of a run.

The algorithm is synchronous and single-threaded; [`run`](crate::algo::DegreeReduction::run)
materializes the complete history before it returns.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod history;
pub mod io;
pub mod node;
pub mod ops;
pub mod playback;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use error::*;
pub use node::*;

/// `mdst::prelude` includes definitions for nodes and edges, all basic graph operation traits,
/// the graph representation as well as the algorithm entry points and output types.
pub mod prelude {
    pub use super::{
        algo::{DegreeReduction, NeighborChoice},
        edge::*,
        error::*,
        history::*,
        node::*,
        ops::*,
        repr::*,
    };
}
