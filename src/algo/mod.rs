/*!
# Graph Algorithms

This module provides the building blocks of the degree reduction and the reduction itself.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use mdst::algo::*;
```
and gain access to traversal, cycle search, component partitioning and [`DegreeReduction`].
If possible, algorithms are provided as **iterators** or as extension traits on graphs.
*/

mod cycle;
mod degree_reduction;
mod labels;
mod partition;
mod spanning_tree;
mod traversal;

use crate::prelude::*;

pub use cycle::*;
pub use degree_reduction::*;
pub use labels::*;
pub use partition::*;
pub use spanning_tree::*;
pub use traversal::*;
