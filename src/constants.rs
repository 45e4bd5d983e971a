//! Global constants for the autosweep application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Grant polling constants
/// Interval between asynchronous grant checks (100ms)
pub const GRANT_POLL_INTERVAL_MS: u64 = 100;

/// Maximum number of grant checks before giving up (~10s total)
pub const GRANT_POLL_MAX_CHECKS: u32 = 100;

// Output layout constants
/// File written after every collection job has finished
pub const RUN_MARKER_FILENAME: &str = "finished_auto_run.txt";

/// Payload of the run marker file
pub const RUN_MARKER_PAYLOAD: &str = "Auto Run Finished";

/// Per-session outcome report
pub const SESSION_REPORT_FILENAME: &str = "collection_summary.json";

/// Directory used under the system temp dir when no output path is given
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "autosweep";

/// Extension for tabular artifacts
pub const TABULAR_EXTENSION: &str = "csv";

/// Extension for tree artifacts
pub const TREE_EXTENSION: &str = "json";

// Writer constants
/// Field delimiter for tabular artifacts
pub const TABULAR_DELIMITER: char = ',';

/// Indentation unit for tree artifacts (4 spaces)
pub const TREE_INDENT: &[u8] = b"    ";

// Authorization constants
/// Name of the elevation token checked against the effective uid
pub const ELEVATED_TOKEN_NAME: &str = "elevated-privileges";
