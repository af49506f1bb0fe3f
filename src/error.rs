//! Error types of the crate.
//!
//! Both structural misuse of a [`Graph`](crate::repr::Graph) and internal invariant violations of
//! the degree reduction are fatal; they are reported as values so that the caller decides how loud
//! the failure should be.

use crate::{Edge, Node};

/// Misuse of the graph editing API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} cannot be added, because there already exists one with the same id")]
    DuplicateNode(Node),

    #[error("node {0} does not exist")]
    MissingNode(Node),

    #[error("edge cannot be added, because source and destination node {0} are the same")]
    SelfLoop(Node),

    #[error("edge {0} cannot be added, because an edge connecting the same nodes already exists")]
    DuplicateEdge(Edge),

    #[error("edge {0} cannot be removed, because it does not exist")]
    MissingEdge(Edge),
}

/// Failures of a degree reduction run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("cannot run algorithm, because the graph is either empty or not fully connected")]
    DisconnectedOrEmpty,

    #[error("cycle cannot be calculated, because start node {0} does not exist")]
    CycleStartMissing(Node),

    #[error("no cycle through node {0} exists")]
    CycleNotFound(Node),

    #[error("node {0} is not part of the cycle")]
    NotOnCycle(Node),

    #[error("node {0} cannot be labelled, because it is not in the set of degree k-1 nodes")]
    DegreeSetMismatch(Node),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
