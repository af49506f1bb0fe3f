use itertools::Itertools;
use rand_distr::{Bernoulli, Distribution};

use crate::{gens::*, utils::*};

/// `G(n,p)` graphs contain every possible undirected edge `{u, v}` with `u < v` of a graph with
/// nodes `0..n` with probability `p`, independent from each other. Edges are emitted normalized
/// and without loops, in lexicographic order.
#[derive(Debug, Copy, Clone, Default)]
pub struct Gnp {
    n: NumNodes,
    p: Option<Bernoulli>,
}

impl Gnp {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    /// ** Panics if `prob` is not a valid probability **
    pub fn prob(mut self, prob: f64) -> Self {
        assert!(prob.is_valid_probability(), "invalid edge probability {prob}");
        self.p = Bernoulli::new(prob).ok();
        self
    }
}

impl NumNodesGen for Gnp {
    /// Updates `n`
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl GraphGenerator for Gnp {
    /// Creates a streaming generator over random `G(n,p)` edges
    /// ** Panics if no probability was set **
    fn stream<R: Rng>(&self, rng: &mut R) -> impl Iterator<Item = Edge> {
        let Some(distr) = self.p else {
            panic!("probability of Gnp was not set");
        };

        (0..self.n)
            .tuple_combinations::<(Node, Node)>()
            .filter(move |_| distr.sample(&mut *rng))
            .map(|(u, v)| Edge(u, v))
    }
}
