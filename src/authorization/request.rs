use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::authorization::{AuthorizationGate, AuthorizationToken, TokenKind};
use crate::constants::{GRANT_POLL_INTERVAL_MS, GRANT_POLL_MAX_CHECKS};
use crate::sources::SourceRegistry;

/// Retry schedule for grants that land asynchronously.
#[derive(Debug, Clone, Copy)]
pub struct GrantPolicy {
    pub poll_interval: Duration,
    pub max_checks: u32,
}

impl Default for GrantPolicy {
    fn default() -> Self {
        GrantPolicy {
            poll_interval: Duration::from_millis(GRANT_POLL_INTERVAL_MS),
            max_checks: GRANT_POLL_MAX_CHECKS,
        }
    }
}

impl GrantPolicy {
    pub fn new(poll_interval: Duration, max_checks: u32) -> Self {
        GrantPolicy { poll_interval, max_checks }
    }
}

/// Requests every grant still missing across the enabled sources of
/// `registry`, then waits for asynchronous grants within `policy`.
///
/// Missing `Runtime` tokens go out as one deduplicated batch; the other
/// kinds are requested or announced one by one. Optional tokens are
/// requested too but never awaited. Returns `true` when every requested
/// non-optional token ended up granted.
pub async fn request_missing_grants(
    gate: &dyn AuthorizationGate,
    registry: &SourceRegistry,
    policy: GrantPolicy,
    cancel: &CancellationToken,
) -> bool {
    let missing = collect_missing_tokens(gate, registry);
    if missing.is_empty() {
        debug!("No grants to request");
        return true;
    }

    info!("{} grant(s) missing across enabled sources", missing.len());

    let runtime: Vec<AuthorizationToken> = missing
        .iter()
        .filter(|t| t.kind == TokenKind::Runtime)
        .cloned()
        .collect();
    if !runtime.is_empty() {
        info!("Requesting {} runtime grant(s) in one batch", runtime.len());
        gate.request_runtime_grants(&runtime);
    }

    // Non-runtime grants land asynchronously; collect the ones worth
    // waiting for.
    let mut awaited = Vec::new();
    for token in &missing {
        match token.kind {
            TokenKind::Runtime => continue,
            TokenKind::SpecialGrant | TokenKind::DeviceAdmin => {
                info!("Requesting special grant: {}", token);
                gate.request_special_grant(token);
            }
            TokenKind::ExternalOnly => {
                info!("External grant needed: {}", token);
                gate.announce_external_grant(token);
            }
        }
        if !token.optional {
            awaited.push(token.clone());
        }
    }

    if awaited.is_empty() {
        return missing
            .iter()
            .filter(|t| !t.optional)
            .all(|t| gate.check_granted(t));
    }

    poll_until_granted(gate, &awaited, policy, cancel).await
}

/// Checks `tokens` every `policy.poll_interval` until all are granted,
/// the check budget runs out, or `cancel` fires.
async fn poll_until_granted(
    gate: &dyn AuthorizationGate,
    tokens: &[AuthorizationToken],
    policy: GrantPolicy,
    cancel: &CancellationToken,
) -> bool {
    info!(
        "Waiting for {} grant(s), up to {} checks every {}ms",
        tokens.len(),
        policy.max_checks,
        policy.poll_interval.as_millis()
    );

    for check in 0..policy.max_checks {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Grant wait cancelled");
                return false;
            }
            _ = tokio::time::sleep(policy.poll_interval) => {}
        }

        if tokens.iter().all(|t| gate.check_granted(t)) {
            debug!("All awaited grants landed after {} check(s)", check + 1);
            return true;
        }
    }

    let still_missing: Vec<&str> = tokens
        .iter()
        .filter(|t| !gate.check_granted(t))
        .map(|t| t.name.as_str())
        .collect();
    warn!("Gave up waiting for grants: {}", still_missing.join(", "));
    false
}

/// Every token missing across enabled sources, deduplicated by name.
/// A required listing outranks an optional one for the same name.
fn collect_missing_tokens(
    gate: &dyn AuthorizationGate,
    registry: &SourceRegistry,
) -> Vec<AuthorizationToken> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut missing: Vec<AuthorizationToken> = Vec::new();

    for source in registry.sources() {
        if !source.is_enabled() {
            continue;
        }
        for token in source.required_authorizations() {
            if gate.check_granted(&token) {
                continue;
            }
            match index.get(&token.name) {
                Some(&i) => {
                    if missing[i].optional && !token.optional {
                        missing[i] = token;
                    }
                }
                None => {
                    index.insert(token.name.clone(), missing.len());
                    missing.push(token);
                }
            }
        }
    }

    missing
}
