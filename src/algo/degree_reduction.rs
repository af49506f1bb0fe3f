/*!
# Degree Reduction

Local search for a spanning tree of small maximum degree. Starting from a breadth-first spanning
tree, the algorithm works in *phases*, one per maximum degree `k`:

1. Let `Dk` and `Dk1` be the nodes of degree `k` and `k - 1`.
2. Partition the tree into components `C` by removing all edges `F` incident to `Dk` or `Dk1` and
   collect the edges `H` of the input graph between two components which avoid `Dk` and `Dk1`.
3. Take the first edge of `H` and the cycle it closes in the tree.
   - Without a node of degree `k` on the cycle, all its nodes in `Dk1` are labelled and
     leave `Dk1`; `H` is recomputed.
   - Otherwise the first such node `w` is reduced: labelled endpoints of the edge apply their
     deferred moves first, then the edge is added and one of `w`'s cycle edges removed.
4. After a move, `Dk` and `Dk1` are recomputed and labels are reset. The phase ends once `Dk` is
   empty; the run ends once `H` is empty.

Every step is recorded into a [`DebugHistory`] unless disabled via
[`DegreeReduction::record_history`].

# Example

```rust
use mdst::prelude::*;

// the square with a diagonal
let graph = Graph::<()>::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
let output = DegreeReduction::new()
    .neighbor_choice(NeighborChoice::Seeded(7))
    .run(&graph)
    .unwrap();

assert_eq!(output.stats.initial_max_node_degree, 3);
assert_eq!(output.stats.final_max_node_degree, 2);
```
*/

use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::*;

/// Rule to pick the cycle edge of a node that is removed by a local move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighborChoice {
    /// The next node in cycle order
    #[default]
    Successor,
    /// Predecessor or successor in cycle order, uniformly at random from a seeded generator
    Seeded(u64),
}

enum NeighborPicker {
    Successor,
    Random(Box<Pcg64Mcg>),
}

impl NeighborPicker {
    fn new(choice: NeighborChoice) -> Self {
        match choice {
            NeighborChoice::Successor => Self::Successor,
            NeighborChoice::Seeded(seed) => Self::Random(Box::new(Pcg64Mcg::seed_from_u64(seed))),
        }
    }

    fn pick(&mut self, cycle: &Cycle, u: Node) -> Result<Node, AlgorithmError> {
        match self {
            Self::Successor => cycle.successor(u),
            Self::Random(rng) => {
                if rng.random_bool(0.5) {
                    cycle.successor(u)
                } else {
                    cycle.predecessor(u)
                }
            }
        }
    }
}

/// Configuration of a degree reduction run.
///
/// ```rust
/// use mdst::prelude::*;
///
/// let mut algo = DegreeReduction::new();
/// algo.set_record_history(false);
///
/// let graph = Graph::<()>::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
/// let output = algo.run(&graph).unwrap();
/// assert_eq!(output.stats.final_max_node_degree, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeReduction {
    neighbor_choice: NeighborChoice,
    record_history: bool,
}

impl Default for DegreeReduction {
    fn default() -> Self {
        Self {
            neighbor_choice: NeighborChoice::default(),
            record_history: true,
        }
    }
}

impl DegreeReduction {
    /// Default configuration: successor tie-break, full history
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-break rule for removed cycle edges
    pub fn neighbor_choice(mut self, choice: NeighborChoice) -> Self {
        self.neighbor_choice = choice;
        self
    }

    /// Sets the tie-break rule for removed cycle edges
    pub fn set_neighbor_choice(&mut self, choice: NeighborChoice) -> &mut Self {
        self.neighbor_choice = choice;
        self
    }

    /// If disabled, phases are recorded without subphases; only the final snapshot is kept
    pub fn record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// If disabled, phases are recorded without subphases; only the final snapshot is kept
    pub fn set_record_history(&mut self, record: bool) -> &mut Self {
        self.record_history = record;
        self
    }

    /// Runs the degree reduction on `graph`, which is only read.
    ///
    /// Fails with [`AlgorithmError::DisconnectedOrEmpty`] if `graph` is empty or disconnected.
    pub fn run<T>(&self, graph: &Graph<T>) -> Result<AlgorithmOutput, AlgorithmError> {
        let tree = graph.arbitrary_spanning_tree()?;
        Run {
            graph,
            tree,
            picker: NeighborPicker::new(self.neighbor_choice),
            record: self.record_history,
        }
        .execute()
    }
}

/// Runs [`DegreeReduction`] with its default configuration
pub fn run<T>(graph: &Graph<T>) -> Result<AlgorithmOutput, AlgorithmError> {
    DegreeReduction::new().run(graph)
}

struct Run<'a, T> {
    graph: &'a Graph<T>,
    tree: Graph<T>,
    picker: NeighborPicker,
    record: bool,
}

impl<T> Run<'_, T> {
    fn execute(mut self) -> Result<AlgorithmOutput, AlgorithmError> {
        let initial = self.tree.max_degree();
        info!(
            nodes = self.graph.number_of_nodes(),
            edges = self.graph.number_of_edges(),
            initial_max_degree = initial,
            "degree reduction started"
        );

        let mut stats = Stats {
            initial_max_node_degree: initial,
            ..Default::default()
        };
        let mut history = DebugHistory::default();

        let mut finished = false;
        while !finished {
            let k = self.tree.max_degree();
            let mut phase = Phase::new(k);
            let mut count = PhaseCount::new(k);
            debug!(k, "phase started");

            finished = self.phase(k, &mut phase, &mut count)?;

            debug!(
                k,
                moves = count.local_moves_of_node_of_degree_k,
                propagated = count.local_moves_of_node_of_degree_k_minus1,
                "phase ended"
            );
            stats.counts.push(count);
            history.phases.push(phase);
        }

        stats.final_max_node_degree = self.tree.max_degree();
        if let Some(last) = history.phases.last_mut() {
            last.subphases.push(Subphase::Finished {
                node_ids: self.tree.node_ids(),
                edge_ids: self.tree.ordered_edges(),
            });
        }

        info!(
            initial_max_degree = stats.initial_max_node_degree,
            final_max_degree = stats.final_max_node_degree,
            local_moves = stats.total_local_moves(),
            "degree reduction finished"
        );

        Ok(AlgorithmOutput { stats, history })
    }

    /// Reduces nodes of degree `k` until none is left (returns *false*) or no further local move
    /// is possible (returns *true*)
    fn phase(
        &mut self,
        k: NumNodes,
        phase: &mut Phase,
        count: &mut PhaseCount,
    ) -> Result<bool, AlgorithmError> {
        let mut degree_k = self.tree.vertices_of_degree(k);
        while !degree_k.is_empty() {
            let mut degree_k_minus1 = self.nodes_of_degree_k_minus1(k);
            if !self.local_move(k, &degree_k, &mut degree_k_minus1, phase, count)? {
                return Ok(true);
            }
            degree_k = self.tree.vertices_of_degree(k);
        }
        Ok(false)
    }

    fn nodes_of_degree_k_minus1(&self, k: NumNodes) -> Vec<Node> {
        k.checked_sub(1)
            .map_or_else(Vec::new, |d| self.tree.vertices_of_degree(d))
    }

    /// Labels nodes until a local move is applied (returns *true*) or `H` runs empty
    fn local_move(
        &mut self,
        k: NumNodes,
        degree_k: &[Node],
        degree_k_minus1: &mut Vec<Node>,
        phase: &mut Phase,
        count: &mut PhaseCount,
    ) -> Result<bool, AlgorithmError> {
        let mut labels = LabelledNodes::new();
        let mut partition = self.partition(degree_k, degree_k_minus1)?;

        while let Some(&outer) = partition.outer_component_edges.first() {
            let cycle = self.closed_cycle(outer)?;
            let state = self.record.then(|| {
                self.capture(
                    degree_k,
                    degree_k_minus1.as_slice(),
                    &partition,
                    &labels,
                    &cycle,
                    outer,
                )
            });

            let Some(w) = cycle.nodes().iter().copied().find(|u| degree_k.contains(u)) else {
                let candidates = cycle
                    .nodes()
                    .iter()
                    .copied()
                    .filter(|u| degree_k_minus1.contains(u))
                    .collect_vec();

                for u in candidates {
                    let neighbor = self.picker.pick(&cycle, u)?;
                    labels.label(
                        u,
                        DeferredMove {
                            neighbor,
                            edge: outer,
                        },
                    );

                    let pos = degree_k_minus1
                        .iter()
                        .position(|&x| x == u)
                        .ok_or(AlgorithmError::DegreeSetMismatch(u))?;
                    degree_k_minus1.remove(pos);
                    trace!(node = u, neighbor, edge = %outer, "node labelled");
                }

                if let Some(state) = state {
                    phase.subphases.push(Subphase::Step(Box::new(SubphaseRecord {
                        state,
                        body: SubphaseBody::Label {
                            updated_labelled_node_ids: labels.ids(),
                            updated_nodes_of_degree_k_minus1: degree_k_minus1.clone(),
                        },
                    })));
                }

                partition = self.partition(degree_k, degree_k_minus1)?;
                continue;
            };

            let before = self.tree.clone();
            let reducible_before = self.number_of_nodes_of_degree_at_least(k);

            let propagated = labels.cascade(&mut self.tree, [outer.0, outer.1])?;
            let applied = self.swap(k, w, outer, &cycle, !propagated.is_empty())?;

            let Some((reduced, removed)) = applied.filter(|_| {
                self.tree.max_degree() <= k
                    && self.number_of_nodes_of_degree_at_least(k) < reducible_before
            }) else {
                debug!(k, node = w, edge = %outer, "local move rejected");
                self.tree = before;
                return Ok(false);
            };

            count.record_move(propagated.len());
            debug!(
                k,
                node = reduced,
                added = %outer,
                removed = %removed,
                propagated = propagated.len(),
                "local move"
            );

            if let Some(state) = state {
                phase.subphases.push(Subphase::Step(Box::new(SubphaseRecord {
                    state,
                    body: SubphaseBody::Move {
                        node_id_to_reduce: reduced,
                        added_edge: outer,
                        removed_edge: removed,
                        edges_in_tree_after: self.tree.ordered_edges(),
                        propagated_moves: propagated,
                    },
                })));
            }

            return Ok(true);
        }

        Ok(false)
    }

    /// Adds `outer` to the tree and removes a cycle edge of `w`. If the tree was changed by a
    /// cascade, the cycle is recomputed; should `w` have left it, the first node of degree at
    /// least `k` on the new cycle is reduced instead. Returns the reduced node and the removed
    /// edge, or `None` if no swap was possible.
    fn swap(
        &mut self,
        k: NumNodes,
        w: Node,
        outer: Edge,
        cycle: &Cycle,
        tree_changed: bool,
    ) -> Result<Option<(Node, Edge)>, AlgorithmError> {
        if self.tree.has_edge(outer.0, outer.1) {
            return Ok(None);
        }

        let recomputed;
        let cycle = if tree_changed {
            recomputed = self.closed_cycle(outer)?;
            &recomputed
        } else {
            cycle
        };

        let reduced = if cycle.contains(w) {
            w
        } else {
            match cycle
                .nodes()
                .iter()
                .copied()
                .find(|&u| self.tree.degree_of(u) >= k)
            {
                Some(u) => u,
                None => return Ok(None),
            }
        };

        let neighbor = self.picker.pick(cycle, reduced)?;
        self.tree.add_edge(outer.0, outer.1)?;
        self.tree.remove_edge(reduced, neighbor)?;

        Ok(Some((reduced, Edge(reduced, neighbor).normalized())))
    }

    fn partition(
        &self,
        degree_k: &[Node],
        degree_k_minus1: &[Node],
    ) -> Result<ComponentPartition, AlgorithmError> {
        let active = degree_k
            .iter()
            .chain(degree_k_minus1)
            .copied()
            .collect_vec();
        ComponentPartition::compute(self.graph, &self.tree, &active)
    }

    /// The cycle closed by adding `outer` to the tree, starting at its first endpoint
    fn closed_cycle(&self, outer: Edge) -> Result<Cycle, AlgorithmError> {
        let mut extended = self.tree.clone();
        extended.add_edge(outer.0, outer.1)?;
        extended.find_cycle(outer.0)
    }

    fn number_of_nodes_of_degree_at_least(&self, k: NumNodes) -> usize {
        self.tree.degrees().filter(|&d| d >= k).count()
    }

    fn capture(
        &self,
        degree_k: &[Node],
        degree_k_minus1: &[Node],
        partition: &ComponentPartition,
        labels: &LabelledNodes,
        cycle: &Cycle,
        outer: Edge,
    ) -> SubphaseState {
        SubphaseState {
            node_ids: self.tree.node_ids(),
            edge_ids: self.tree.ordered_edges(),
            nodes_of_degree_k: degree_k.to_vec(),
            nodes_of_degree_k_minus1: degree_k_minus1.to_vec(),
            f: partition.f.clone(),
            c: partition.components.clone(),
            outer_component_edges: partition.outer_component_edges.clone(),
            labelled_node_ids: labels.ids(),
            cycle: CycleRecord {
                node_ids: cycle.nodes().to_vec(),
                edge_ids: cycle.edges(),
                closing_edge: outer,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    fn moves(history: &DebugHistory) -> Vec<(Node, Edge, Edge, usize)> {
        history
            .records()
            .filter_map(|r| match &r.body {
                SubphaseBody::Move {
                    node_id_to_reduce,
                    added_edge,
                    removed_edge,
                    propagated_moves,
                    ..
                } => Some((
                    *node_id_to_reduce,
                    *added_edge,
                    *removed_edge,
                    propagated_moves.len(),
                )),
                SubphaseBody::Label { .. } => None,
            })
            .collect_vec()
    }

    fn assert_consistent<T>(graph: &Graph<T>, output: &AlgorithmOutput) {
        let history = &output.history;
        let final_edges = history.final_tree().unwrap().to_vec();

        let mut tree = graph.clone_with(true);
        tree.add_edges(final_edges.iter().copied()).unwrap();
        assert_spanning_tree(graph, &tree);
        assert_eq!(tree.max_degree(), output.stats.final_max_node_degree);
        assert!(output.stats.final_max_node_degree <= output.stats.initial_max_node_degree);

        let initial = history.initial_tree().unwrap();
        assert_eq!(history.replay(initial.iter().copied()), final_edges);

        for record in history.records() {
            if let SubphaseBody::Move {
                added_edge,
                removed_edge,
                propagated_moves,
                ..
            } = &record.body
            {
                for e in propagated_moves
                    .iter()
                    .flat_map(|m| [m.added_edge, m.removed_edge])
                    .chain([*added_edge, *removed_edge])
                {
                    assert!(graph.has_edge(e.0, e.1));
                }
            }
        }

        let propagated: usize = moves(history).iter().map(|m| m.3).sum();
        assert_eq!(
            output.stats.total_local_moves() as usize,
            history.number_of_moves() + propagated
        );
        assert_eq!(output.stats.counts.len(), history.phases.len());
    }

    #[test]
    fn square_is_already_optimal() {
        let graph = graph_from(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
        let output = run(&graph).unwrap();

        assert_eq!(output.stats.initial_max_node_degree, 2);
        assert_eq!(output.stats.final_max_node_degree, 2);
        assert_eq!(output.stats.total_local_moves(), 0);
        assert_eq!(output.stats.counts, vec![PhaseCount::new(2)]);

        assert_eq!(output.history.phases.len(), 1);
        assert_eq!(output.history.phases[0].k, 2);
        assert_eq!(
            output.history.phases[0].subphases,
            vec![Subphase::Finished {
                node_ids: vec![0, 1, 2, 3],
                edge_ids: vec![Edge(0, 1), Edge(0, 3), Edge(1, 2)],
            }]
        );
    }

    #[test]
    fn star_cannot_be_reduced() {
        let graph = graph_from(6, (1..6).map(|v| (0, v)));
        let output = run(&graph).unwrap();

        assert_eq!(output.stats.initial_max_node_degree, 5);
        assert_eq!(output.stats.final_max_node_degree, 5);
        assert_eq!(output.stats.total_local_moves(), 0);
        assert_eq!(output.history.number_of_moves(), 0);
    }

    #[test]
    fn complete_graph() {
        let graph = graph_from(5, (0..5).tuple_combinations::<(Node, Node)>());
        let output = run(&graph).unwrap();

        assert_eq!(output.stats.initial_max_node_degree, 4);
        assert_eq!(output.stats.final_max_node_degree, 2);
        assert_eq!(
            moves(&output.history),
            vec![(0, Edge(1, 2), Edge(0, 2), 0), (0, Edge(2, 3), Edge(0, 3), 0)]
        );
        assert_eq!(
            output
                .stats
                .counts
                .iter()
                .map(|c| (c.max_node_degree, c.local_moves))
                .collect_vec(),
            vec![(4, 1), (3, 1), (2, 0)]
        );
        assert_consistent(&graph, &output);
    }

    #[test]
    fn disconnected_or_empty() {
        let isolated = Graph::with_nodes([(0, ()), (1, ())]).unwrap();
        assert_eq!(run(&isolated), Err(AlgorithmError::DisconnectedOrEmpty));
        assert_eq!(
            run(&Graph::<()>::new()),
            Err(AlgorithmError::DisconnectedOrEmpty)
        );
    }

    #[test]
    fn single_node_and_single_edge() {
        let single = Graph::with_nodes([(3, ())]).unwrap();
        let output = run(&single).unwrap();
        assert_eq!(output.stats.final_max_node_degree, 0);
        assert!(output.history.finished().is_some());

        let pair = graph_from(2, [(0, 1)]);
        let output = run(&pair).unwrap();
        assert_eq!(output.stats.final_max_node_degree, 1);
        assert_eq!(output.history.final_tree().unwrap(), &[Edge(0, 1)]);
    }

    //        0
    //    / /   \  \
    //   1  2    3  4      non-tree edges (5, 6) and (1, 2)
    //  / \
    // 5   6
    #[test]
    fn labelling_and_propagation() {
        let graph = graph_from(
            7,
            [(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (5, 6), (1, 2)],
        );
        let output = run(&graph).unwrap();

        assert_eq!(output.stats.initial_max_node_degree, 4);
        assert_eq!(output.stats.final_max_node_degree, 3);
        assert_eq!(
            output.stats.counts[0],
            PhaseCount {
                max_node_degree: 4,
                local_moves: 2,
                local_moves_of_node_of_degree_k: 1,
                local_moves_of_node_of_degree_k_minus1: 1,
            }
        );

        let subphases = &output.history.phases[0].subphases;
        assert_eq!(subphases.len(), 2);

        let label = subphases[0].record().unwrap();
        assert_eq!(label.state.nodes_of_degree_k, vec![0]);
        assert_eq!(label.state.nodes_of_degree_k_minus1, vec![1]);
        assert_eq!(label.state.outer_component_edges, vec![Edge(5, 6)]);
        assert_eq!(label.state.cycle.node_ids, vec![5, 1, 6]);
        assert_eq!(
            label.body,
            SubphaseBody::Label {
                updated_labelled_node_ids: vec![1],
                updated_nodes_of_degree_k_minus1: vec![],
            }
        );

        let mv = subphases[1].record().unwrap();
        assert_eq!(mv.state.labelled_node_ids, vec![1]);
        assert_eq!(mv.state.outer_component_edges, vec![Edge(1, 2)]);
        assert_eq!(mv.state.c, vec![vec![0], vec![1, 5, 6], vec![2], vec![3], vec![4]]);
        let SubphaseBody::Move {
            node_id_to_reduce,
            added_edge,
            removed_edge,
            propagated_moves,
            ..
        } = &mv.body
        else {
            panic!("expected a move");
        };
        assert_eq!(*node_id_to_reduce, 0);
        assert_eq!(*added_edge, Edge(1, 2));
        assert_eq!(*removed_edge, Edge(0, 2));
        assert_eq!(propagated_moves.len(), 1);
        assert_eq!(propagated_moves[0].node_id, 1);
        assert_eq!(propagated_moves[0].added_edge, Edge(5, 6));
        assert_eq!(propagated_moves[0].removed_edge, Edge(1, 6));

        assert_consistent(&graph, &output);
    }

    //        0
    //    / /   \  \
    //   1  2    3  4      non-tree edge (5, 6)
    //  / \
    // 5   6
    #[test]
    fn labelling_exhausts_outer_edges() {
        let graph = graph_from(7, [(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (5, 6)]);
        let tree_edges = vec![
            Edge(0, 1),
            Edge(0, 2),
            Edge(0, 3),
            Edge(0, 4),
            Edge(1, 5),
            Edge(1, 6),
        ];
        let output = run(&graph).unwrap();

        assert_eq!(output.stats.initial_max_node_degree, 4);
        assert_eq!(output.stats.final_max_node_degree, 4);
        assert_eq!(output.stats.counts, vec![PhaseCount::new(4)]);
        assert_eq!(output.history.phases.len(), 1);
        assert_eq!(output.history.phases[0].k, 4);

        let subphases = &output.history.phases[0].subphases;
        assert_eq!(subphases.len(), 2);

        let label = subphases[0].record().unwrap();
        assert_eq!(label.state.edge_ids, tree_edges);
        assert_eq!(label.state.nodes_of_degree_k, vec![0]);
        assert_eq!(label.state.nodes_of_degree_k_minus1, vec![1]);
        assert_eq!(label.state.c.len(), 7);
        assert_eq!(label.state.outer_component_edges, vec![Edge(5, 6)]);
        assert!(label.state.labelled_node_ids.is_empty());
        assert_eq!(label.state.cycle.node_ids, vec![5, 1, 6]);
        assert_eq!(label.state.cycle.closing_edge, Edge(5, 6));
        assert_eq!(
            label.body,
            SubphaseBody::Label {
                updated_labelled_node_ids: vec![1],
                updated_nodes_of_degree_k_minus1: vec![],
            }
        );

        assert_eq!(
            subphases[1],
            Subphase::Finished {
                node_ids: (0..7).collect_vec(),
                edge_ids: tree_edges,
            }
        );
        assert_eq!(output.history.number_of_moves(), 0);
        assert_consistent(&graph, &output);
    }

    #[test]
    fn input_graph_is_not_modified() {
        let graph = graph_from(5, (0..5).tuple_combinations::<(Node, Node)>());
        let edges = graph.ordered_edges();
        run(&graph).unwrap();
        assert_eq!(graph.ordered_edges(), edges);
    }

    #[test]
    fn without_history() {
        let graph = graph_from(5, (0..5).tuple_combinations::<(Node, Node)>());
        let recorded = run(&graph).unwrap();
        let output = DegreeReduction::new()
            .record_history(false)
            .run(&graph)
            .unwrap();

        assert_eq!(output.stats, recorded.stats);
        assert_eq!(output.history.records().count(), 0);
        assert_eq!(output.history.final_tree(), recorded.history.final_tree());
    }

    #[test]
    fn seeded_choice_is_deterministic() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        let graph = random_connected_graph(rng, 30, 0.15);

        let algo = DegreeReduction::new().neighbor_choice(NeighborChoice::Seeded(5));
        let a = algo.run(&graph).unwrap();
        let b = algo.run(&graph).unwrap();
        assert_eq!(a, b);
        assert_consistent(&graph, &a);
    }

    #[test]
    fn random_graphs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0xdead);
        for n in [3 as NumNodes, 8, 16, 40] {
            for p in [0.05, 0.2, 0.5] {
                for choice in [NeighborChoice::Successor, NeighborChoice::Seeded(n as u64)] {
                    let graph = random_connected_graph(rng, n, p);
                    let output = DegreeReduction::new()
                        .neighbor_choice(choice)
                        .run(&graph)
                        .unwrap();
                    assert_consistent(&graph, &output);
                }
            }
        }
    }
}
