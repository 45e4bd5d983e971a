use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map, Value};
use sysinfo::{CpuExt, System, SystemExt};

use crate::models::CollectionResult;
use crate::sources::{CollectionError, Source};

pub const SOURCE_ID: &str = "system_info";

/// Host identity, OS release and CPU summary.
pub struct SystemInfoSource {
    enabled: bool,
}

impl SystemInfoSource {
    pub fn new(enabled: bool) -> Self {
        SystemInfoSource { enabled }
    }
}

#[async_trait]
impl Source for SystemInfoSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        "System Information"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        debug!("Querying system information");

        let mut system = System::new_all();
        system.refresh_all();

        // Missing values stay null here; the tree writer renders them
        // as the string "null"
        let value = json!({
            "hostname": system.host_name(),
            "os": {
                "name": system.name(),
                "version": system.os_version(),
                "kernel": system.kernel_version(),
            },
            "cpu": {
                "count": system.cpus().len(),
                "brand": system.cpus().first().map(|cpu| cpu.brand().to_string()),
                "frequency_mhz": system.cpus().first().map_or(0, |cpu| cpu.frequency()),
            },
            "uptime_seconds": system.uptime(),
        });

        let root: Map<String, Value> = value.as_object().cloned().unwrap_or_default();
        Ok(CollectionResult::tree(root))
    }
}
