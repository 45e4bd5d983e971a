use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use sysinfo::{System, SystemExt};

use crate::models::CollectionResult;
use crate::sources::{CollectionError, Source};

pub const SOURCE_ID: &str = "memory";

/// Memory and swap usage in bytes.
pub struct MemorySource {
    enabled: bool,
}

impl MemorySource {
    pub fn new(enabled: bool) -> Self {
        MemorySource { enabled }
    }
}

#[async_trait]
impl Source for MemorySource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        "Memory Usage"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        debug!("Querying memory usage");

        let mut system = System::new();
        system.refresh_memory();

        let mut root = Map::new();
        root.insert("total_memory_bytes".to_string(), Value::from(system.total_memory()));
        root.insert("used_memory_bytes".to_string(), Value::from(system.used_memory()));
        root.insert(
            "available_memory_bytes".to_string(),
            Value::from(system.available_memory()),
        );
        root.insert("total_swap_bytes".to_string(), Value::from(system.total_swap()));
        root.insert("used_swap_bytes".to_string(), Value::from(system.used_swap()));

        Ok(CollectionResult::tree(root))
    }
}
