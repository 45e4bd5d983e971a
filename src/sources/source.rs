use async_trait::async_trait;

use crate::authorization::AuthorizationToken;
use crate::models::CollectionResult;

/// Failure raised by a source while querying its subsystem.
///
/// The runner catches it at the job boundary; it never crosses over to
/// sibling jobs.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct CollectionError {
    reason: String,
}

impl CollectionError {
    pub fn new(reason: impl Into<String>) -> Self {
        CollectionError { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<anyhow::Error> for CollectionError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the Context chain in one line
        CollectionError { reason: format!("{:#}", err) }
    }
}

/// One independently collectable unit of work.
///
/// Implementations hold no mutable run state; the runner owns the whole
/// per-session lifecycle. `is_enabled` and `required_authorizations`
/// must stay constant for the lifetime of the instance.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable identifier; the artifact file stem derives from it
    fn id(&self) -> &str;

    /// Human-readable label for logs and reports
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Fixed at construction, typically from platform capability detection
    fn is_enabled(&self) -> bool {
        true
    }

    /// Grants that must be held before the source may run; empty means none
    fn required_authorizations(&self) -> Vec<AuthorizationToken> {
        Vec::new()
    }

    /// Queries the underlying subsystem and produces the artifact payload.
    ///
    /// A payload with no columns (tabular) or an empty root (tree) fails
    /// the job; genuine "no data" must still carry structure, e.g. a
    /// header-only tabular result.
    async fn collect(&self) -> Result<CollectionResult, CollectionError>;
}
