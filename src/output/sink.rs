use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::constants::{RUN_MARKER_FILENAME, RUN_MARKER_PAYLOAD, SESSION_REPORT_FILENAME};
use crate::models::{ArtifactKind, SessionReport};

/// Owns the session output directory.
///
/// Artifact destinations are disjoint by construction (one file per
/// source id), so concurrent jobs can write through a shared sink
/// without coordination.
pub struct OutputSink {
    directory: PathBuf,
}

impl OutputSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        OutputSink { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the session directory; with `clear`, removes everything
    /// from earlier sessions first. Failure here is the one fatal
    /// condition of a session: no job may start without a directory.
    pub fn prepare(&self, clear: bool) -> Result<()> {
        if clear && self.directory.exists() {
            fs::remove_dir_all(&self.directory).with_context(|| {
                format!("Failed to clear output directory {}", self.directory.display())
            })?;
            debug!("Cleared previous session output at {}", self.directory.display());
        }

        fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create output directory {}", self.directory.display())
        })?;

        info!("Output directory ready at {}", self.directory.display());
        Ok(())
    }

    /// Deterministic artifact file name for a source id. Bytes outside
    /// `[A-Za-z0-9._-]` map to `_` so ids carrying separators or URIs
    /// stay single path components.
    pub fn artifact_filename(source_id: &str, kind: ArtifactKind) -> String {
        let stem: String = source_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.{}", stem, kind.extension())
    }

    pub fn artifact_path(&self, source_id: &str, kind: ArtifactKind) -> PathBuf {
        self.directory.join(Self::artifact_filename(source_id, kind))
    }

    pub fn marker_path(&self) -> PathBuf {
        self.directory.join(RUN_MARKER_FILENAME)
    }

    pub fn report_path(&self) -> PathBuf {
        self.directory.join(SESSION_REPORT_FILENAME)
    }

    /// Best effort; a session without a report is still a valid session.
    pub fn write_report(&self, report: &SessionReport) {
        let path = self.report_path();
        match serde_json::to_string_pretty(report) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    warn!("Failed to write session report to {}: {}", path.display(), e);
                } else {
                    info!("Session report written to {}", path.display());
                }
            }
            Err(e) => warn!("Failed to serialize session report: {}", e),
        }
    }

    /// Written exactly once per session, strictly after the join-barrier.
    /// Best effort; failure is logged and the session still counts as
    /// finished.
    pub fn write_marker(&self) {
        let path = self.marker_path();
        if let Err(e) = fs::write(&path, RUN_MARKER_PAYLOAD) {
            warn!("Failed to write run marker to {}: {}", path.display(), e);
        } else {
            debug!("Run marker written to {}", path.display());
        }
    }
}
