use async_trait::async_trait;
use log::debug;
use sysinfo::{PidExt, ProcessExt, ProcessStatus, System, SystemExt};

use crate::authorization::AuthorizationToken;
use crate::models::CollectionResult;
use crate::platform;
use crate::sources::{CollectionError, Source};

pub const SOURCE_ID: &str = "processes";

const COLUMNS: &[&str] = &[
    "pid",
    "name",
    "status",
    "cpu_percent",
    "memory_bytes",
    "parent_pid",
    "exe",
];

/// Snapshot of the running process table.
///
/// Works unprivileged, but full visibility into other users' processes
/// wants elevation, so the source carries the elevation token as
/// optional. Argv stays out of the table: argv values routinely contain
/// the field delimiter, and tabular values pass through verbatim.
pub struct ProcessListSource {
    enabled: bool,
}

impl ProcessListSource {
    pub fn new(enabled: bool) -> Self {
        ProcessListSource { enabled }
    }
}

fn status_label(status: ProcessStatus) -> &'static str {
    match status {
        ProcessStatus::Run => "Running",
        ProcessStatus::Sleep => "Sleeping",
        ProcessStatus::Stop => "Stopped",
        ProcessStatus::Zombie => "Zombie",
        ProcessStatus::Idle => "Idle",
        _ => "Unknown",
    }
}

#[async_trait]
impl Source for ProcessListSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        "Running Processes"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn required_authorizations(&self) -> Vec<AuthorizationToken> {
        vec![platform::elevated_token().as_optional()]
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        debug!("Querying process table");

        let mut system = System::new_all();
        system.refresh_all();

        let columns: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::with_capacity(system.processes().len());

        for (pid, process) in system.processes() {
            rows.push(vec![
                pid.as_u32().to_string(),
                process.name().to_string(),
                status_label(process.status()).to_string(),
                format!("{:.1}", process.cpu_usage()),
                process.memory().to_string(),
                process
                    .parent()
                    .map(|p| p.as_u32().to_string())
                    .unwrap_or_default(),
                process.exe().to_string_lossy().to_string(),
            ]);
        }

        Ok(CollectionResult::tabular(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::TokenKind;

    #[tokio::test]
    async fn test_collect_reports_this_process() {
        let source = ProcessListSource::new(true);
        let result = source.collect().await.unwrap();

        match result {
            CollectionResult::Tabular { columns, rows } => {
                assert_eq!(columns.len(), COLUMNS.len());
                assert!(!rows.is_empty(), "at least the test process must appear");
                for row in &rows {
                    assert_eq!(row.len(), columns.len());
                }
                let own_pid = std::process::id().to_string();
                assert!(rows.iter().any(|row| row[0] == own_pid));
            }
            CollectionResult::Tree { .. } => panic!("expected a tabular payload"),
        }
    }

    #[test]
    fn test_elevation_token_is_optional() {
        let source = ProcessListSource::new(true);
        let tokens = source.required_authorizations();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "elevated-privileges");
        assert_eq!(tokens[0].kind, TokenKind::ExternalOnly);
        assert!(tokens[0].optional);
    }

    #[test]
    fn test_status_labels_stable() {
        assert_eq!(status_label(ProcessStatus::Run), "Running");
        assert_eq!(status_label(ProcessStatus::Sleep), "Sleeping");
        assert_eq!(status_label(ProcessStatus::Zombie), "Zombie");
    }
}
