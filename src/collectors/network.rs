use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map};
use sysinfo::{NetworkExt, System, SystemExt};

use crate::models::CollectionResult;
use crate::sources::{CollectionError, Source};

pub const SOURCE_ID: &str = "network_interfaces";

/// Cumulative traffic counters per network interface.
///
/// Interface names key the tree; a host without interfaces yields an
/// empty root and therefore a failed job, which is the intended signal
/// in a collection context.
pub struct NetworkInterfacesSource {
    enabled: bool,
}

impl NetworkInterfacesSource {
    pub fn new(enabled: bool) -> Self {
        NetworkInterfacesSource { enabled }
    }
}

#[async_trait]
impl Source for NetworkInterfacesSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        "Network Interfaces"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        debug!("Querying network interfaces");

        let mut system = System::new();
        system.refresh_networks_list();
        system.refresh_networks();

        let mut root = Map::new();
        for (name, data) in system.networks() {
            root.insert(
                name.to_string(),
                json!({
                    "received_bytes": data.total_received(),
                    "transmitted_bytes": data.total_transmitted(),
                    "packets_received": data.total_packets_received(),
                    "packets_transmitted": data.total_packets_transmitted(),
                }),
            );
        }

        Ok(CollectionResult::tree(root))
    }
}
