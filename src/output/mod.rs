//! Artifact serialization and the session output directory.
//!
//! Each source maps to exactly one file under the session directory,
//! named from its id. Tabular payloads become delimited text, tree
//! payloads become indented JSON. The sink also owns the two
//! session-level files: the outcome report and the run marker.

/// Session directory lifecycle and file naming
pub mod sink;

/// Delimited-text writer for tabular payloads
pub mod tabular;

/// Indented-JSON writer for tree payloads
pub mod tree;

pub use sink::OutputSink;
