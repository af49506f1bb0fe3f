/*!
# Node Representation

We choose `Node = u32` as node ids are caller-assigned, non-negative and almost always small.
Ids do not have to be dense: a graph stores its nodes in a map keyed by id, so memory depends on
the number of nodes only.
*/

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;
