//! Built-in sources backed by local system queries.
//!
//! These give the binary something real to collect: five sources
//! covering host identity, processes, network interfaces, memory and
//! disks, all through `sysinfo`. They are ordinary [`Source`]
//! implementations with no special standing in the framework.
//!
//! Enablement is capability detection at construction: a source on an
//! unsupported platform reports itself disabled instead of failing at
//! collection time. The session config can additionally disable any of
//! them by id.
//!
//! [`Source`]: crate::sources::Source

use std::sync::Arc;

use sysinfo::{System, SystemExt};

use crate::sources::SourceRegistry;

/// Host identity, OS and CPU summary (tree)
pub mod system_info;

/// Running process table (tabular)
pub mod processes;

/// Per-interface traffic counters (tree)
pub mod network;

/// Memory and swap usage (tree)
pub mod memory;

/// Mounted disk capacities (tabular)
pub mod disks;

pub use disks::DiskUsageSource;
pub use memory::MemorySource;
pub use network::NetworkInterfacesSource;
pub use processes::ProcessListSource;
pub use system_info::SystemInfoSource;

fn enabled(id: &str, disabled_ids: &[String]) -> bool {
    System::IS_SUPPORTED && !disabled_ids.iter().any(|d| d == id)
}

/// Assembles the default registry, honoring config-level disables.
/// Disabled sources are still registered so they show up as such in
/// the session report.
pub fn builtin_registry(disabled_ids: &[String]) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry
        .register(Arc::new(SystemInfoSource::new(enabled(
            system_info::SOURCE_ID,
            disabled_ids,
        ))))
        .register(Arc::new(ProcessListSource::new(enabled(
            processes::SOURCE_ID,
            disabled_ids,
        ))))
        .register(Arc::new(NetworkInterfacesSource::new(enabled(
            network::SOURCE_ID,
            disabled_ids,
        ))))
        .register(Arc::new(MemorySource::new(enabled(
            memory::SOURCE_ID,
            disabled_ids,
        ))))
        .register(Arc::new(DiskUsageSource::new(enabled(
            disks::SOURCE_ID,
            disabled_ids,
        ))));
    registry
}

/// All built-in source ids, in registry order.
pub fn builtin_ids() -> Vec<&'static str> {
    vec![
        system_info::SOURCE_ID,
        processes::SOURCE_ID,
        network::SOURCE_ID,
        memory::SOURCE_ID,
        disks::SOURCE_ID,
    ]
}
