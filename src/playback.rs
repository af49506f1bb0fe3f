/*!
# Playback

A debugger-like view on a [`DebugHistory`]. A [`Cursor`] addresses a single position inside the
history: a phase, one of its subphases, a [`PlaybackStep`] of that subphase and, for the final
step of a move, an index into its propagated moves. Every position resolves to a [`Frame`] holding
exactly the node and edge ids that should be shown, copied from the recorded data.

Positions of a recorded subphase, in order:

| step | positions |
|---|---|
| `ShowTree` ... `ShowCycle` | one each |
| `ShowBody` of a label | one |
| `ShowBody` of a move | one per propagated move, then one for the move itself |

The terminal snapshot of a run only has a `ShowTree` position.

```rust
use mdst::{playback::*, prelude::*};

let graph = Graph::<()>::from_edges(5, [(0, 1), (0, 2), (0, 3), (0, 4), (1, 2)]).unwrap();
let output = DegreeReduction::new().run(&graph).unwrap();
let history = &output.history;

let mut cursor = Cursor::start(history).unwrap();
let mut positions = 1;
while cursor.next(history) {
    positions += 1;
}
// eight steps for the single move plus the final tree
assert_eq!(positions, 9);
assert!(history.frame(&cursor).unwrap().finished);
```
*/

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{history::*, *};

/// The fixed sequence of steps shown for every recorded subphase
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackStep {
    #[default]
    ShowTree,
    ShowNodesOfDegreeK,
    ShowNodesOfDegreeKMinus1,
    ShowF,
    ShowC,
    ShowOuterComponentEdges,
    ShowCycle,
    ShowBody,
}

impl PlaybackStep {
    pub const ALL: [PlaybackStep; 8] = [
        PlaybackStep::ShowTree,
        PlaybackStep::ShowNodesOfDegreeK,
        PlaybackStep::ShowNodesOfDegreeKMinus1,
        PlaybackStep::ShowF,
        PlaybackStep::ShowC,
        PlaybackStep::ShowOuterComponentEdges,
        PlaybackStep::ShowCycle,
        PlaybackStep::ShowBody,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Explanation of this step for a phase with maximum degree `k`.
    /// `contains_move` selects between the two texts of [`PlaybackStep::ShowBody`].
    pub fn hint(self, k: NumNodes, contains_move: bool) -> Hint {
        let km1 = k.saturating_sub(1);
        let (title, text) = match self {
            PlaybackStep::ShowTree => (
                "Current spanning tree".to_string(),
                "Show all nodes (blue) and edges (blue) belonging to the current spanning tree."
                    .to_string(),
            ),
            PlaybackStep::ShowNodesOfDegreeK => (
                format!("Nodes of degree {k}"),
                format!("Find all nodes of degree {k} (light-blue)."),
            ),
            PlaybackStep::ShowNodesOfDegreeKMinus1 => (
                format!("Nodes of degree {k} and {km1}"),
                format!("Find all nodes of degree {k} (light-blue) and {km1} (blue)."),
            ),
            PlaybackStep::ShowF => (
                "Edges in F".to_string(),
                format!(
                    "Find all edges of F (blue) where at least one of the endpoints is a node of \
                     degree {k} (light-blue) or {km1} (blue)."
                ),
            ),
            PlaybackStep::ShowC => (
                "Components in C".to_string(),
                "Show all components of C (different colored) that would be created if the edges \
                 of F were removed from the spanning tree."
                    .to_string(),
            ),
            PlaybackStep::ShowOuterComponentEdges => (
                "Edges in H".to_string(),
                format!(
                    "Find all edges of H (dashed blue) connecting two components of C (different \
                     colored). Furthermore, the connected components must not contain nodes of \
                     degree {k} or {km1}. If there are no more left the algorithm terminates."
                ),
            ),
            PlaybackStep::ShowCycle => (
                "Form a cycle".to_string(),
                "Form a cycle (blue) with any edge (dashed blue) of H.".to_string(),
            ),
            PlaybackStep::ShowBody if contains_move => (
                "Local moves".to_string(),
                format!(
                    "Since a node of degree {k} (light-blue) is included in the cycle, reduce its \
                     degree by 1 by removing one of the adjacency edges (dashed blue) of the node \
                     from the spanning tree and adding the cycle-closing edge (blue) to the \
                     spanning tree. If one of the endpoints of the newly added edge is a node \
                     labelled as reducible, reduce its degree and propagate (orange) further if \
                     necessary. Then remove the label for all reducible nodes and start over."
                ),
            ),
            PlaybackStep::ShowBody => (
                "Label nodes".to_string(),
                format!(
                    "Since there is no node of degree {k} (light-blue) in the cycle, label all \
                     nodes of degree {km1} (blue) in the cycle as reducible for a later time. Then \
                     do not count the labelled nodes (black border) as nodes of degree {km1} \
                     anymore."
                ),
            ),
        };
        Hint { title, text }
    }
}

/// Human readable explanation of a playback step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub title: String,
    pub text: String,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.text)
    }
}

/// A position inside a [`DebugHistory`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Cursor {
    pub phase: usize,
    pub subphase: usize,
    pub step: PlaybackStep,
    pub body: usize,
}

impl Cursor {
    /// The first position of `history`, if it has any
    pub fn start(history: &DebugHistory) -> Option<Self> {
        Self::first_of_phase_from(history, 0)
    }

    /// The last position of `history`, if it has any
    pub fn end(history: &DebugHistory) -> Option<Self> {
        let (phase, p) = history
            .phases
            .iter()
            .enumerate()
            .rev()
            .find(|(_, p)| !p.subphases.is_empty())?;
        Some(Self::last_of(phase, p.subphases.len() - 1, p.subphases.last()?))
    }

    /// Returns *true* if the cursor addresses an existing position of `history`
    pub fn is_valid(&self, history: &DebugHistory) -> bool {
        let Some(subphase) = subphase_at(history, self.phase, self.subphase) else {
            return false;
        };
        match subphase.record() {
            None => self.step == PlaybackStep::ShowTree && self.body == 0,
            Some(record) => {
                (self.step == PlaybackStep::ShowBody && self.body < body_len(record))
                    || self.body == 0
            }
        }
    }

    /// Advances by one position. Returns *false* (and stays) at the end of the history.
    pub fn next(&mut self, history: &DebugHistory) -> bool {
        let Some(subphase) = subphase_at(history, self.phase, self.subphase) else {
            return false;
        };

        if let Some(record) = subphase.record() {
            if self.step == PlaybackStep::ShowBody {
                if self.body + 1 < body_len(record) {
                    self.body += 1;
                    return true;
                }
            } else if let Some(step) = self.step.next() {
                self.step = step;
                self.body = 0;
                return true;
            }
        }

        self.skip_subphase(history)
    }

    /// Moves back by one position. Returns *false* (and stays) at the start of the history.
    pub fn back(&mut self, history: &DebugHistory) -> bool {
        if subphase_at(history, self.phase, self.subphase).is_none() {
            return false;
        }

        if self.body > 0 {
            self.body -= 1;
            return true;
        }
        if let Some(step) = self.step.prev() {
            self.step = step;
            return true;
        }

        let previous = if self.subphase > 0 {
            Some((self.phase, self.subphase - 1))
        } else {
            history.phases[..self.phase]
                .iter()
                .enumerate()
                .rev()
                .find(|(_, p)| !p.subphases.is_empty())
                .map(|(i, p)| (i, p.subphases.len() - 1))
        };

        match previous.and_then(|(p, s)| Some((p, s, subphase_at(history, p, s)?))) {
            Some((p, s, subphase)) => {
                *self = Self::last_of(p, s, subphase);
                true
            }
            None => false,
        }
    }

    /// Jumps to the first position of the next subphase, which may lie in the next phase.
    /// Returns *false* (and stays) if there is none.
    pub fn skip_subphase(&mut self, history: &DebugHistory) -> bool {
        let Some(phase) = history.phases.get(self.phase) else {
            return false;
        };

        if self.subphase + 1 < phase.subphases.len() {
            *self = Self {
                phase: self.phase,
                subphase: self.subphase + 1,
                ..Default::default()
            };
            return true;
        }

        self.skip_phase(history)
    }

    /// Jumps to the first position of the next phase with at least one subphase.
    /// Returns *false* (and stays) if there is none.
    pub fn skip_phase(&mut self, history: &DebugHistory) -> bool {
        match Self::first_of_phase_from(history, self.phase + 1) {
            Some(cursor) => {
                *self = cursor;
                true
            }
            None => false,
        }
    }

    fn first_of_phase_from(history: &DebugHistory, phase: usize) -> Option<Self> {
        let phase = phase
            + history
                .phases
                .get(phase..)?
                .iter()
                .position(|p| !p.subphases.is_empty())?;
        Some(Self {
            phase,
            ..Default::default()
        })
    }

    fn last_of(phase: usize, subphase: usize, sp: &Subphase) -> Self {
        match sp.record() {
            None => Self {
                phase,
                subphase,
                ..Default::default()
            },
            Some(record) => Self {
                phase,
                subphase,
                step: PlaybackStep::ShowBody,
                body: body_len(record) - 1,
            },
        }
    }
}

fn subphase_at(history: &DebugHistory, phase: usize, subphase: usize) -> Option<&Subphase> {
    history.phases.get(phase)?.subphases.get(subphase)
}

fn body_len(record: &SubphaseRecord) -> usize {
    match &record.body {
        SubphaseBody::Label { .. } => 1,
        SubphaseBody::Move {
            propagated_moves, ..
        } => propagated_moves.len() + 1,
    }
}

/// What to display at a [`Cursor`] position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub k: NumNodes,
    pub step: PlaybackStep,
    /// *true* for the terminal snapshot of the run
    pub finished: bool,
    /// The tree to draw
    pub node_ids: Vec<Node>,
    pub edge_ids: Vec<Edge>,
    /// Nodes and edges to emphasize on top of the tree
    pub highlighted_node_ids: Vec<Node>,
    pub highlighted_edge_ids: Vec<Edge>,
    /// Components to color differently; only set for [`PlaybackStep::ShowC`]
    pub components: Vec<Vec<Node>>,
    /// Ids of labelled nodes at this point
    pub labelled_node_ids: Vec<Node>,
}

impl DebugHistory {
    /// Resolves `cursor` to the data recorded for its position, or `None` if the cursor is not
    /// a valid position
    pub fn frame(&self, cursor: &Cursor) -> Option<Frame> {
        if !cursor.is_valid(self) {
            return None;
        }
        let k = self.phases[cursor.phase].k;
        let subphase = subphase_at(self, cursor.phase, cursor.subphase)?;

        let Some(record) = subphase.record() else {
            return Some(Frame {
                k,
                finished: true,
                node_ids: subphase.node_ids().to_vec(),
                edge_ids: subphase.edge_ids().to_vec(),
                ..Default::default()
            });
        };

        let state = &record.state;
        let mut frame = Frame {
            k,
            step: cursor.step,
            node_ids: state.node_ids.clone(),
            edge_ids: state.edge_ids.clone(),
            labelled_node_ids: state.labelled_node_ids.clone(),
            ..Default::default()
        };

        match cursor.step {
            PlaybackStep::ShowTree => {}
            PlaybackStep::ShowNodesOfDegreeK => {
                frame.highlighted_node_ids = state.nodes_of_degree_k.clone();
            }
            PlaybackStep::ShowNodesOfDegreeKMinus1 => {
                frame.highlighted_node_ids = state
                    .nodes_of_degree_k
                    .iter()
                    .chain(&state.nodes_of_degree_k_minus1)
                    .copied()
                    .collect();
            }
            PlaybackStep::ShowF => {
                frame.highlighted_node_ids = state
                    .nodes_of_degree_k
                    .iter()
                    .chain(&state.nodes_of_degree_k_minus1)
                    .copied()
                    .collect();
                frame.highlighted_edge_ids = state.f.clone();
            }
            PlaybackStep::ShowC => {
                frame.edge_ids.retain(|e| !state.f.contains(e));
                frame.components = state.c.clone();
            }
            PlaybackStep::ShowOuterComponentEdges => {
                frame.edge_ids.retain(|e| !state.f.contains(e));
                frame.components = state.c.clone();
                frame.highlighted_edge_ids = state.outer_component_edges.clone();
            }
            PlaybackStep::ShowCycle => {
                frame.highlighted_node_ids = state.cycle.node_ids.clone();
                frame.highlighted_edge_ids = state.cycle.edge_ids.clone();
            }
            PlaybackStep::ShowBody => match &record.body {
                SubphaseBody::Label {
                    updated_labelled_node_ids,
                    ..
                } => {
                    frame.highlighted_node_ids = state.cycle.node_ids.clone();
                    frame.highlighted_edge_ids = state.cycle.edge_ids.clone();
                    frame.labelled_node_ids = updated_labelled_node_ids.clone();
                }
                SubphaseBody::Move {
                    node_id_to_reduce,
                    added_edge,
                    removed_edge,
                    edges_in_tree_after,
                    propagated_moves,
                } => {
                    let (node, added, removed, after) = match propagated_moves.get(cursor.body) {
                        Some(m) => (
                            m.node_id,
                            m.added_edge,
                            m.removed_edge,
                            &m.edges_in_tree_after,
                        ),
                        None => (
                            *node_id_to_reduce,
                            *added_edge,
                            *removed_edge,
                            edges_in_tree_after,
                        ),
                    };
                    frame.edge_ids = after.clone();
                    frame.highlighted_node_ids = vec![node];
                    frame.highlighted_edge_ids = vec![added, removed];
                }
            },
        }

        Some(frame)
    }

    /// Hint for the position of `cursor`
    pub fn hint(&self, cursor: &Cursor) -> Option<Hint> {
        let phase = self.phases.get(cursor.phase)?;
        let subphase = phase.subphases.get(cursor.subphase)?;
        let contains_move = subphase.record().is_some_and(|r| r.body.is_move());
        Some(cursor.step.hint(phase.k, contains_move))
    }
}
