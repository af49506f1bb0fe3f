//! # JSON export
//!
//! Serializes the output of a run with `serde_json`. Field names are camelCase and the debug
//! history is stored under `debugHistory`, which is the shape the playback front-end consumes.

use super::*;

/// Serializes `output` into a compact JSON string
pub fn to_json_string(output: &AlgorithmOutput) -> serde_json::Result<String> {
    serde_json::to_string(output)
}

/// Serializes `output` into an indented JSON string
pub fn to_json_string_pretty(output: &AlgorithmOutput) -> serde_json::Result<String> {
    serde_json::to_string_pretty(output)
}

/// Writes `output` as JSON into `writer`
pub fn to_writer<W: Write>(output: &AlgorithmOutput, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer(writer, output)
}
