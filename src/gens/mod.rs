/*!
# Graph Generators

This module provides builders for input graphs of the degree reduction.

Random generators follow a builder-style pattern:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using builder methods (e.g., `.nodes(n).prob(p)`).
3. Generate edges via `generate()` or `stream()`.

Additionally there are
- substructure helpers to connect cliques and stars inside an existing graph,
- [`ConnectNearest`] to connect nodes embedded in the plane to their nearest neighbors,
- the [`Preset`] graphs (a star-shaped graph, `K4`, German cities and a random graph).
*/

use rand::Rng;

use crate::prelude::*;

mod gnp;
mod nearest;
mod presets;
mod substructures;

pub use gnp::*;
pub use nearest::*;
pub use presets::*;
pub use substructures::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// General trait for a configurable random edge generator.
///
/// Types implementing this trait can produce a complete edge list
/// or a lazily-evaluated stream (iterator) of edges.
pub trait GraphGenerator {
    /// Generates a list of random edges.
    ///
    /// This collects the full result from `stream()` into a `Vec<Edge>` as default.
    fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Creates a lazy iterator (stream) over generated edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = Edge>
    where
        R: Rng;
}
