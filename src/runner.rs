//! Session orchestration: readiness evaluation, concurrent fan-out,
//! the join-barrier, and the completion marker.
//!
//! The runner owns all per-source run state for one session; sources
//! themselves stay stateless. A batch run snapshots the ready set,
//! spawns one task per source, joins the whole set, then writes the
//! session report and finally the run marker. Nothing observes the
//! marker before every job has finished.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use futures::future;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::authorization::{self, AuthorizationGate, GrantPolicy};
use crate::models::{CollectionResult, RunState, SessionReport, SourceOutcome};
use crate::output::{tabular, tree, OutputSink};
use crate::sources::{CollectionError, Source, SourceRegistry};

/// Failure of a single collection job. Always confined to its own job;
/// siblings and the barrier never see it.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("required authorization missing: {0}")]
    AuthorizationMissing(String),

    #[error("collection failed: {0}")]
    Collection(#[from] CollectionError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Drives a registry of sources through one collection session.
pub struct SourceRunner {
    gate: Arc<dyn AuthorizationGate>,
    sink: Arc<OutputSink>,
    grant_policy: GrantPolicy,
    states: HashMap<String, RunState>,
}

impl SourceRunner {
    pub fn new(gate: Arc<dyn AuthorizationGate>, sink: Arc<OutputSink>) -> Self {
        SourceRunner {
            gate,
            sink,
            grant_policy: GrantPolicy::default(),
            states: HashMap::new(),
        }
    }

    pub fn with_grant_policy(mut self, policy: GrantPolicy) -> Self {
        self.grant_policy = policy;
        self
    }

    /// Current state of a source; sources never seen by an evaluation
    /// report `Uninitialized`.
    pub fn state(&self, source_id: &str) -> RunState {
        self.states
            .get(source_id)
            .copied()
            .unwrap_or(RunState::Uninitialized)
    }

    pub fn states(&self) -> &HashMap<String, RunState> {
        &self.states
    }

    /// Recomputes readiness for every source that is not settled yet.
    /// Disabled, running and finished sources keep their state, so the
    /// evaluation is idempotent and safe to repeat at any time.
    pub fn evaluate(&mut self, registry: &SourceRegistry) {
        for source in registry.sources() {
            let current = self.state(source.id());
            if current.is_settled() {
                continue;
            }

            let next = if !source.is_enabled() {
                RunState::Disabled
            } else if self.gate.satisfies(source.as_ref()) {
                RunState::Ready
            } else {
                RunState::NeedsAuthorization
            };

            if next != current {
                debug!("Source {}: {:?} -> {:?}", source.id(), current, next);
            }
            self.states.insert(source.id().to_string(), next);
        }
    }

    /// Requests everything still missing across the registry, waits for
    /// asynchronous grants within the configured policy, then
    /// re-evaluates readiness. Returns whether every requested
    /// non-optional grant landed.
    pub async fn request_missing_grants(
        &mut self,
        registry: &SourceRegistry,
        cancel: &CancellationToken,
    ) -> bool {
        self.evaluate(registry);
        let all_granted = authorization::request_missing_grants(
            self.gate.as_ref(),
            registry,
            self.grant_policy,
            cancel,
        )
        .await;
        self.evaluate(registry);
        all_granted
    }

    /// Runs every `Ready` source concurrently, one task each, joins the
    /// whole batch, then writes the session report and the run marker.
    ///
    /// The ready set is snapshotted before the first task starts and
    /// never mutated while jobs are outstanding. The only fatal errors
    /// are an unusable registry (duplicate ids) and the sink refusing to
    /// prepare; both abort before any job starts.
    pub async fn run(&mut self, registry: &SourceRegistry) -> Result<SessionReport> {
        let started_at = Utc::now();

        let duplicates = registry.duplicate_ids();
        if !duplicates.is_empty() {
            bail!("duplicate source ids in registry: {}", duplicates.join(", "));
        }

        self.evaluate(registry);

        let ready: Vec<Arc<dyn Source>> = registry
            .sources()
            .iter()
            .filter(|s| self.state(s.id()) == RunState::Ready)
            .cloned()
            .collect();

        info!("Running {} of {} source(s)", ready.len(), registry.len());

        let mut handles = Vec::with_capacity(ready.len());
        for source in &ready {
            self.states.insert(source.id().to_string(), RunState::Running);
            let source = Arc::clone(source);
            let sink = Arc::clone(&self.sink);
            handles.push(tokio::spawn(async move {
                let id = source.id().to_string();
                let result = run_job(source, sink).await;
                (id, result)
            }));
        }

        // Join-barrier: nothing below runs before every job finished
        let mut artifacts: HashMap<String, String> = HashMap::new();
        let mut errors: HashMap<String, String> = HashMap::new();
        for (index, joined) in future::join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok((id, Ok(artifact))) => {
                    info!("Source {} finished: {}", id, artifact);
                    self.states.insert(id.clone(), RunState::Succeeded);
                    artifacts.insert(id, artifact);
                }
                Ok((id, Err(e))) => {
                    warn!("Source {} failed: {}", id, e);
                    self.states.insert(id.clone(), RunState::Failed);
                    errors.insert(id, e.to_string());
                }
                Err(e) => {
                    // A panicked job is a failed job; the panic never
                    // leaves its task
                    let id = ready[index].id().to_string();
                    warn!("Source {} panicked: {}", id, e);
                    self.states.insert(id.clone(), RunState::Failed);
                    errors.insert(id, format!("job panicked: {}", e));
                }
            }
        }

        let outcomes = self.build_outcomes(registry, &artifacts, &errors);
        let report = SessionReport::new(started_at, outcomes);
        self.sink.write_report(&report);
        self.sink.write_marker();

        info!(
            "Session finished: {} succeeded, {} failed",
            report.succeeded, report.failed
        );
        Ok(report)
    }

    fn build_outcomes(
        &self,
        registry: &SourceRegistry,
        artifacts: &HashMap<String, String>,
        errors: &HashMap<String, String>,
    ) -> Vec<SourceOutcome> {
        registry
            .sources()
            .iter()
            .map(|source| {
                let state = self.state(source.id());
                let error = match state {
                    RunState::Failed => errors.get(source.id()).cloned(),
                    RunState::NeedsAuthorization => {
                        let missing: Vec<String> = self
                            .gate
                            .missing_required(source.as_ref())
                            .into_iter()
                            .map(|t| t.name)
                            .collect();
                        Some(JobError::AuthorizationMissing(missing.join(", ")).to_string())
                    }
                    _ => None,
                };

                SourceOutcome {
                    id: source.id().to_string(),
                    display_name: source.display_name().to_string(),
                    state,
                    artifact: artifacts.get(source.id()).cloned(),
                    error,
                }
            })
            .collect()
    }
}

/// One collection job: query the source, enforce the empty-payload
/// policy, serialize through the matching writer. Returns the artifact
/// file name.
async fn run_job(source: Arc<dyn Source>, sink: Arc<OutputSink>) -> Result<String, JobError> {
    info!("Collecting source: {}", source.display_name());

    let result = source.collect().await?;

    if result.is_empty() {
        return Err(JobError::Collection(CollectionError::new(
            "source produced an empty payload",
        )));
    }

    let path = sink.artifact_path(source.id(), result.kind());
    let written = match &result {
        CollectionResult::Tabular { columns, rows } => tabular::write_tabular(&path, columns, rows),
        CollectionResult::Tree { root } => tree::write_tree(&path, root),
    };
    written.map_err(|e| JobError::Serialization(format!("{:#}", e)))?;

    Ok(OutputSink::artifact_filename(source.id(), result.kind()))
}
