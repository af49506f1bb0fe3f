/*!
# Run History

Everything a degree reduction run leaves behind: summary [`Stats`] and a [`DebugHistory`] with
one [`Phase`] per target degree `k`, each holding the [`Subphase`]s that were executed.

All records are plain data. They serialize with camelCase field names, so the JSON produced by
[`crate::io::json`] can be consumed by a visualization without further mapping.
*/

use fxhash::FxHashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::*;

/// The result of a degree reduction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmOutput {
    pub stats: Stats,
    #[serde(rename = "debugHistory")]
    pub history: DebugHistory,
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub initial_max_node_degree: NumNodes,
    pub final_max_node_degree: NumNodes,
    pub counts: Vec<PhaseCount>,
}

impl Stats {
    /// Number of local moves over all phases, propagated moves included
    pub fn total_local_moves(&self) -> u64 {
        self.counts.iter().map(|c| c.local_moves).sum()
    }
}

/// Move counters of a single phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCount {
    pub max_node_degree: NumNodes,
    pub local_moves: u64,
    pub local_moves_of_node_of_degree_k: u64,
    pub local_moves_of_node_of_degree_k_minus1: u64,
}

impl PhaseCount {
    pub fn new(max_node_degree: NumNodes) -> Self {
        Self {
            max_node_degree,
            ..Default::default()
        }
    }

    /// Counts one move of a degree-`k` node preceded by `propagated` cascade steps
    pub fn record_move(&mut self, propagated: usize) {
        self.local_moves_of_node_of_degree_k += 1;
        self.local_moves_of_node_of_degree_k_minus1 += propagated as u64;
        self.local_moves =
            self.local_moves_of_node_of_degree_k + self.local_moves_of_node_of_degree_k_minus1;
    }
}

/// The recorded course of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebugHistory {
    pub phases: Vec<Phase>,
}

/// All subphases executed while the maximum degree was `k`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub k: NumNodes,
    pub subphases: Vec<Subphase>,
}

impl Phase {
    pub fn new(k: NumNodes) -> Self {
        Self {
            k,
            subphases: Vec::new(),
        }
    }
}

/// One iteration of the inner loop, or the terminal state of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Subphase {
    Step(Box<SubphaseRecord>),
    #[serde(rename_all = "camelCase")]
    Finished {
        node_ids: Vec<Node>,
        edge_ids: Vec<Edge>,
    },
}

impl Subphase {
    pub fn is_finished(&self) -> bool {
        matches!(self, Subphase::Finished { .. })
    }

    /// Returns the recorded step unless this is the terminal snapshot
    pub fn record(&self) -> Option<&SubphaseRecord> {
        match self {
            Subphase::Step(record) => Some(record),
            Subphase::Finished { .. } => None,
        }
    }

    /// Node ids of the tree at the beginning of the subphase
    pub fn node_ids(&self) -> &[Node] {
        match self {
            Subphase::Step(record) => &record.state.node_ids,
            Subphase::Finished { node_ids, .. } => node_ids,
        }
    }

    /// Edges of the tree at the beginning of the subphase
    pub fn edge_ids(&self) -> &[Edge] {
        match self {
            Subphase::Step(record) => &record.state.edge_ids,
            Subphase::Finished { edge_ids, .. } => edge_ids,
        }
    }
}

/// State of the algorithm at the moment an outer component edge was picked.
/// All edges are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubphaseState {
    pub node_ids: Vec<Node>,
    pub edge_ids: Vec<Edge>,
    pub nodes_of_degree_k: Vec<Node>,
    pub nodes_of_degree_k_minus1: Vec<Node>,
    #[serde(rename = "F")]
    pub f: Vec<Edge>,
    #[serde(rename = "C")]
    pub c: Vec<Vec<Node>>,
    pub outer_component_edges: Vec<Edge>,
    pub labelled_node_ids: Vec<Node>,
    pub cycle: CycleRecord,
}

/// The cycle closed by the picked outer component edge
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    pub node_ids: Vec<Node>,
    pub edge_ids: Vec<Edge>,
    pub closing_edge: Edge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubphaseRecord {
    #[serde(flatten)]
    pub state: SubphaseState,
    pub body: SubphaseBody,
}

/// What a subphase did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubphaseBody {
    /// No node of degree `k` on the cycle: the degree `k - 1` nodes on it were labelled
    #[serde(rename_all = "camelCase")]
    Label {
        updated_labelled_node_ids: Vec<Node>,
        updated_nodes_of_degree_k_minus1: Vec<Node>,
    },
    /// A local move, preceded by the deferred moves it triggered
    #[serde(rename_all = "camelCase")]
    Move {
        node_id_to_reduce: Node,
        added_edge: Edge,
        removed_edge: Edge,
        edges_in_tree_after: Vec<Edge>,
        propagated_moves: Vec<PropagatedMove>,
    },
}

impl SubphaseBody {
    pub fn is_move(&self) -> bool {
        matches!(self, SubphaseBody::Move { .. })
    }
}

/// A deferred move of a labelled node that was applied during a cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagatedMove {
    pub node_id: Node,
    pub added_edge: Edge,
    pub removed_edge: Edge,
    pub edges_in_tree_after: Vec<Edge>,
}

impl DebugHistory {
    /// Iterates over all recorded steps in execution order
    pub fn records(&self) -> impl Iterator<Item = &SubphaseRecord> + '_ {
        self.phases
            .iter()
            .flat_map(|phase| phase.subphases.iter())
            .filter_map(Subphase::record)
    }

    /// Number of subphases that performed a local move
    pub fn number_of_moves(&self) -> usize {
        self.records().filter(|r| r.body.is_move()).count()
    }

    /// The terminal snapshot, if the run completed
    pub fn finished(&self) -> Option<&Subphase> {
        self.phases
            .last()
            .and_then(|phase| phase.subphases.last())
            .filter(|s| s.is_finished())
    }

    /// Edges of the tree the run started with. Falls back to the final tree if no step was
    /// recorded.
    pub fn initial_tree(&self) -> Option<&[Edge]> {
        self.records()
            .next()
            .map(|r| r.state.edge_ids.as_slice())
            .or_else(|| self.final_tree())
    }

    /// Edges of the tree the run ended with
    pub fn final_tree(&self) -> Option<&[Edge]> {
        self.finished().map(Subphase::edge_ids)
    }

    /// Applies every recorded edge swap to `initial_edges` in execution order and returns the
    /// resulting sorted edge set
    pub fn replay<I>(&self, initial_edges: I) -> Vec<Edge>
    where
        I: IntoIterator,
        I::Item: Into<Edge>,
    {
        let mut edges: FxHashSet<Edge> = initial_edges
            .into_iter()
            .map(|e| e.into().normalized())
            .collect();

        let mut swap = |added: Edge, removed: Edge| {
            edges.insert(added.normalized());
            edges.remove(&removed.normalized());
        };

        for record in self.records() {
            if let SubphaseBody::Move {
                added_edge,
                removed_edge,
                propagated_moves,
                ..
            } = &record.body
            {
                for m in propagated_moves {
                    swap(m.added_edge, m.removed_edge);
                }
                swap(*added_edge, *removed_edge);
            }
        }

        edges.into_iter().sorted().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_record(before: Vec<Edge>, added: Edge, removed: Edge, after: Vec<Edge>) -> Subphase {
        Subphase::Step(Box::new(SubphaseRecord {
            state: SubphaseState {
                node_ids: vec![0, 1, 2, 3],
                edge_ids: before,
                ..Default::default()
            },
            body: SubphaseBody::Move {
                node_id_to_reduce: removed.0,
                added_edge: added,
                removed_edge: removed,
                edges_in_tree_after: after,
                propagated_moves: vec![],
            },
        }))
    }

    fn star_to_path() -> DebugHistory {
        let start = vec![Edge(0, 1), Edge(0, 2), Edge(0, 3)];
        let after = vec![Edge(0, 1), Edge(0, 2), Edge(2, 3)];
        DebugHistory {
            phases: vec![
                Phase {
                    k: 3,
                    subphases: vec![move_record(start, Edge(2, 3), Edge(0, 3), after.clone())],
                },
                Phase {
                    k: 2,
                    subphases: vec![Subphase::Finished {
                        node_ids: vec![0, 1, 2, 3],
                        edge_ids: after,
                    }],
                },
            ],
        }
    }

    #[test]
    fn replay_matches_final_tree() {
        let history = star_to_path();
        assert_eq!(history.number_of_moves(), 1);
        assert_eq!(
            history.initial_tree().unwrap(),
            &[Edge(0, 1), Edge(0, 2), Edge(0, 3)]
        );

        let replayed = history.replay(history.initial_tree().unwrap().iter().copied());
        assert_eq!(replayed, history.final_tree().unwrap());
    }

    #[test]
    fn phase_counts() {
        let mut count = PhaseCount::new(4);
        count.record_move(0);
        count.record_move(2);
        assert_eq!(count.local_moves_of_node_of_degree_k, 2);
        assert_eq!(count.local_moves_of_node_of_degree_k_minus1, 2);
        assert_eq!(count.local_moves, 4);

        let stats = Stats {
            initial_max_node_degree: 4,
            final_max_node_degree: 3,
            counts: vec![count, PhaseCount::new(3)],
        };
        assert_eq!(stats.total_local_moves(), 4);
    }

    #[test]
    fn serialized_field_names() {
        let stats = Stats {
            initial_max_node_degree: 3,
            final_max_node_degree: 2,
            counts: vec![PhaseCount::new(3)],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["initialMaxNodeDegree"], 3);
        assert_eq!(json["counts"][0]["localMovesOfNodeOfDegreeKMinus1"], 0);

        let history = star_to_path();
        let json = serde_json::to_value(&history).unwrap();
        let step = &json["phases"][0]["subphases"][0];
        assert_eq!(step["state"], "step");
        assert_eq!(step["body"]["type"], "move");
        assert_eq!(step["body"]["addedEdge"], serde_json::json!([2, 3]));
        assert_eq!(step["edgeIds"][0], serde_json::json!([0, 1]));
        assert_eq!(json["phases"][1]["subphases"][0]["state"], "finished");

        let back: DebugHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }

    #[test]
    fn default_state() {
        let state = SubphaseState::default();
        assert!(state.node_ids.is_empty() && state.edge_ids.is_empty());
        assert_eq!(state.cycle.closing_edge, Edge(0, 0));
        assert!(state.cycle.node_ids.is_empty());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["cycle"]["closingEdge"], serde_json::json!([0, 0]));
    }

    #[test]
    fn empty_history() {
        let history = DebugHistory::default();
        assert_eq!(history.number_of_moves(), 0);
        assert!(history.finished().is_none());
        assert!(history.initial_tree().is_none());
        assert_eq!(history.replay([(0, 1)]), vec![Edge(0, 1)]);
    }
}
