use async_trait::async_trait;
use log::debug;
use sysinfo::{DiskExt, System, SystemExt};

use crate::models::CollectionResult;
use crate::sources::{CollectionError, Source};

pub const SOURCE_ID: &str = "disks";

const COLUMNS: &[&str] = &[
    "name",
    "mount_point",
    "file_system",
    "total_bytes",
    "available_bytes",
    "removable",
];

/// Capacity and filesystem per mounted disk.
pub struct DiskUsageSource {
    enabled: bool,
}

impl DiskUsageSource {
    pub fn new(enabled: bool) -> Self {
        DiskUsageSource { enabled }
    }
}

#[async_trait]
impl Source for DiskUsageSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        "Disk Usage"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        debug!("Querying mounted disks");

        let mut system = System::new();
        system.refresh_disks_list();

        let columns: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::new();

        for disk in system.disks() {
            let file_system = std::str::from_utf8(disk.file_system())
                .unwrap_or("unknown")
                .to_string();

            rows.push(vec![
                disk.name().to_string_lossy().to_string(),
                disk.mount_point().to_string_lossy().to_string(),
                file_system,
                disk.total_space().to_string(),
                disk.available_space().to_string(),
                disk.is_removable().to_string(),
            ]);
        }

        Ok(CollectionResult::tabular(columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_keeps_rows_aligned_with_header() {
        let source = DiskUsageSource::new(true);
        let result = source.collect().await.unwrap();

        match result {
            CollectionResult::Tabular { columns, rows } => {
                assert_eq!(columns.len(), COLUMNS.len());
                // Containers can expose zero disks
                for row in &rows {
                    assert_eq!(row.len(), columns.len());
                    let total: u64 = row[3].parse().unwrap();
                    let available: u64 = row[4].parse().unwrap();
                    assert!(available <= total);
                }
            }
            CollectionResult::Tree { .. } => panic!("expected a tabular payload"),
        }
    }

    #[test]
    fn test_identity() {
        let source = DiskUsageSource::new(false);
        assert_eq!(source.id(), "disks");
        assert!(!source.is_enabled());
    }
}
