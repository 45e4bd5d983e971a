use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use crate::constants::{TABULAR_EXTENSION, TREE_EXTENSION};

/// Structured payload produced by a single source.
///
/// Tabular results become delimited text files, tree results become
/// indented JSON. The variant decides the artifact extension.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionResult {
    Tabular {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Tree {
        root: Map<String, Value>,
    },
}

impl CollectionResult {
    pub fn tabular(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        CollectionResult::Tabular { columns, rows }
    }

    pub fn tree(root: Map<String, Value>) -> Self {
        CollectionResult::Tree { root }
    }

    /// An empty payload fails the producing job. A tabular result with
    /// columns but no rows is not empty; the header alone is a valid
    /// artifact.
    pub fn is_empty(&self) -> bool {
        match self {
            CollectionResult::Tabular { columns, .. } => columns.is_empty(),
            CollectionResult::Tree { root } => root.is_empty(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            CollectionResult::Tabular { .. } => ArtifactKind::Tabular,
            CollectionResult::Tree { .. } => ArtifactKind::Tree,
        }
    }
}

/// Artifact flavor, used for deterministic file naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Tabular,
    Tree,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Tabular => TABULAR_EXTENSION,
            ArtifactKind::Tree => TREE_EXTENSION,
        }
    }
}

/// Per-source lifecycle state, owned by the runner for one session.
///
/// ```text
///                    +-> Disabled
///                    |
/// Uninitialized -----+-> NeedsAuthorization <-+ (re-evaluated)
///                    |                        |
///                    +-> Ready ---------------+
///                         |
///                         v
///                      Running -> Succeeded | Failed
/// ```
///
/// `Disabled`, `Succeeded` and `Failed` are terminal for the session;
/// a source enters `Running` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Uninitialized,
    Disabled,
    NeedsAuthorization,
    Ready,
    Running,
    Succeeded,
    Failed,
}

impl RunState {
    /// States that readiness evaluation must never overwrite.
    pub fn is_settled(&self) -> bool {
        !matches!(self, RunState::Uninitialized | RunState::NeedsAuthorization | RunState::Ready)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Disabled | RunState::Succeeded | RunState::Failed)
    }
}

/// Final record for one source in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub id: String,
    pub display_name: String,
    pub state: RunState,
    /// Artifact file name, present only on success
    pub artifact: Option<String>,
    /// Failure diagnostic, present only on failure
    pub error: Option<String>,
}

/// Session envelope written to the report file after the join-barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub hostname: Option<String>,
    pub platform: String,
    pub tool_version: String,
    pub started_at: String,
    pub finished_at: String,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<SourceOutcome>,
}

impl SessionReport {
    pub fn new(started_at: chrono::DateTime<chrono::Utc>, outcomes: Vec<SourceOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.state == RunState::Succeeded).count();
        let failed = outcomes.iter().filter(|o| o.state == RunState::Failed).count();

        SessionReport {
            session_id: uuid::Uuid::new_v4().to_string(),
            hostname: hostname::get().ok().map(|h| h.to_string_lossy().to_string()),
            platform: std::env::consts::OS.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: started_at.to_rfc3339(),
            finished_at: chrono::Utc::now().to_rfc3339(),
            succeeded,
            failed,
            outcomes,
        }
    }
}
