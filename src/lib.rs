//! # autosweep
//!
//! A concurrent forensic collection framework: independent data sources
//! run as parallel jobs against a shared output directory, gated by an
//! authorization layer and finished off with a completion marker.
//!
//! ## Overview
//!
//! autosweep models each piece of evidence as a [`Source`]: a stateless
//! unit that knows what authorizations it needs and how to query its
//! subsystem. A [`SourceRunner`] owns the per-session lifecycle,
//! evaluates readiness, fans the ready set out as one task per source,
//! joins the whole batch, then writes a session report and the run
//! marker that downstream tooling watches for.
//!
//! ## Features
//!
//! - **Concurrent collection**: one task per ready source, failures
//!   isolated per job
//! - **Authorization gating**: runtime grants are batched, slower grant
//!   kinds are polled with a bounded wait
//! - **Two artifact shapes**: tabular CSV and pretty-printed JSON trees
//! - **Deterministic completion**: the run marker is the last file
//!   written, after every job has settled
//! - **Flexible configuration**: YAML session config plus CLI overrides
//!
//! ## Usage
//!
//! ### Running a session
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use autosweep::collectors::builtin_registry;
//! use autosweep::output::OutputSink;
//! use autosweep::platform::PlatformGate;
//! use autosweep::runner::SourceRunner;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = builtin_registry(&[]);
//! let sink = Arc::new(OutputSink::new("/tmp/autosweep"));
//! sink.prepare(true)?;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let report = runtime.block_on(async {
//!     let mut runner = SourceRunner::new(Arc::new(PlatformGate::default()), sink);
//!     runner.run(&registry).await
//! })?;
//!
//! println!("{} of {} sources succeeded", report.succeeded, report.outcomes.len());
//! # Ok(())
//! # }
//! ```
//!
//! ### Implementing a source
//!
//! ```no_run
//! use async_trait::async_trait;
//! use autosweep::models::CollectionResult;
//! use autosweep::sources::{CollectionError, Source};
//!
//! struct KernelVersion;
//!
//! #[async_trait]
//! impl Source for KernelVersion {
//!     fn id(&self) -> &str {
//!         "kernel_version"
//!     }
//!
//!     async fn collect(&self) -> Result<CollectionResult, CollectionError> {
//!         let version = std::fs::read_to_string("/proc/version")
//!             .map_err(|e| CollectionError::new(e.to_string()))?;
//!         let mut root = serde_json::Map::new();
//!         root.insert("version".to_string(), version.trim().into());
//!         Ok(CollectionResult::Tree { root })
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Run states, collection payloads and the session report
//! - [`sources`]: The [`Source`] contract and the registry
//! - [`authorization`]: Tokens, the gate trait and the grant request flow
//! - [`output`]: Artifact writers and the output directory sink
//! - [`runner`]: Session orchestration and the join-barrier
//! - [`collectors`]: Built-in sources backed by local system queries
//! - [`platform`]: Host capability detection and the default gate
//! - [`config`]: YAML session configuration
//! - [`constants`]: Application-wide constants
//!
//! [`Source`]: sources::Source
//! [`SourceRunner`]: runner::SourceRunner

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Run states, collection payloads and the session report
pub mod models;

/// The source contract and the registry holding a session's sources
pub mod sources;

/// Authorization tokens, gate trait and the grant request flow
pub mod authorization;

/// Artifact writers and the output directory sink
pub mod output;

/// Session orchestration: readiness, concurrent fan-out, completion
pub mod runner;

/// Built-in sources backed by local system queries
pub mod collectors;

/// Host capability detection and the default authorization gate
pub mod platform;

/// YAML session configuration
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
