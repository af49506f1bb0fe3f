/*!
# Graph Representation

The only storage backend is [`Graph`], a map from (caller-assigned) node ids to slots.
Every slot holds the node payload behind an [`Arc`](std::sync::Arc) and an insertion-ordered
[`Neighborhood`]. Cloning a graph copies the neighborhoods but shares the payloads, so nodes keep
their identity across clones while the adjacency of a clone can be edited independently.
*/

use crate::{ops::*, *};

mod graph;
mod neighborhood;

pub use graph::*;
pub use neighborhood::*;
