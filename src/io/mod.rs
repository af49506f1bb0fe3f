/*!
# IO

Export of the output of a run. [`json`] serializes an [`AlgorithmOutput`] (stats and debug
history) with the field names the playback front-end expects. Input graphs are built in memory
through [`GraphNodeEditing`] and [`GraphEdgeEditing`]; there is no graph file format.
*/

pub mod json;

use std::io::Write;

use crate::prelude::*;

pub use json::*;
