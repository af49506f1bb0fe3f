use super::*;

/// Construction of an initial spanning tree
pub trait SpanningTree: Sized {
    /// Returns a spanning tree made of the edges a breadth-first search traverses, started at the
    /// first node in insertion order. The tree shares all nodes with `self`.
    ///
    /// Fails if the graph is empty or not connected.
    fn arbitrary_spanning_tree(&self) -> Result<Self, AlgorithmError>;
}

impl<T> SpanningTree for Graph<T> {
    fn arbitrary_spanning_tree(&self) -> Result<Self, AlgorithmError> {
        let mut components = self.visited_components();
        let (Some(component), None) = (components.next(), components.next()) else {
            return Err(AlgorithmError::DisconnectedOrEmpty);
        };

        let mut tree = self.clone_with(true);
        tree.add_edges(component.edges)?;
        Ok(tree)
    }
}
