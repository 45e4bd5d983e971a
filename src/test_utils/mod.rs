//! Test utilities for autosweep
//!
//! This module provides common testing utilities, helpers, and mocks
//! for use across all test modules.

#![cfg(test)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use crate::authorization::{AuthorizationGate, AuthorizationToken};
use crate::models::CollectionResult;
use crate::sources::{CollectionError, Source};

/// Creates a temporary directory that is automatically cleaned up
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Sample nested tree payload used across writer and runner tests
pub fn sample_tree() -> Map<String, Value> {
    let mut root = Map::new();
    root.insert("x".to_string(), json!({ "y": [1, 2] }));
    root
}

enum Behavior {
    Tree,
    Tabular,
    EmptyTree,
    EmptyTabular,
    Fail(String),
    Panic,
}

/// Scriptable source for exercising the runner without real subsystems.
///
/// Counts `collect` invocations so tests can assert a source was or was
/// not run.
pub struct TestSource {
    id: String,
    display_name: Option<String>,
    enabled: bool,
    tokens: Vec<AuthorizationToken>,
    behavior: Behavior,
    delay: Option<Duration>,
    collect_calls: AtomicUsize,
}

impl TestSource {
    fn with_behavior(id: &str, behavior: Behavior) -> Self {
        TestSource {
            id: id.to_string(),
            display_name: None,
            enabled: true,
            tokens: Vec::new(),
            behavior,
            delay: None,
            collect_calls: AtomicUsize::new(0),
        }
    }

    /// Produces a one-entry tree payload
    pub fn tree(id: &str) -> Self {
        Self::with_behavior(id, Behavior::Tree)
    }

    /// Produces a two-column tabular payload with one row
    pub fn tabular(id: &str) -> Self {
        Self::with_behavior(id, Behavior::Tabular)
    }

    /// Produces a tree with an empty root (fails the job)
    pub fn empty_tree(id: &str) -> Self {
        Self::with_behavior(id, Behavior::EmptyTree)
    }

    /// Produces a tabular payload without columns (fails the job)
    pub fn empty_tabular(id: &str) -> Self {
        Self::with_behavior(id, Behavior::EmptyTabular)
    }

    /// Always fails with the given reason
    pub fn failing(id: &str, reason: &str) -> Self {
        Self::with_behavior(id, Behavior::Fail(reason.to_string()))
    }

    /// Panics inside `collect`, for join-error handling tests
    pub fn panicking(id: &str) -> Self {
        Self::with_behavior(id, Behavior::Panic)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn named(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn requiring(mut self, token: AuthorizationToken) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn collect_count(&self) -> usize {
        self.collect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for TestSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn required_authorizations(&self) -> Vec<AuthorizationToken> {
        self.tokens.clone()
    }

    async fn collect(&self) -> Result<CollectionResult, CollectionError> {
        self.collect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behavior {
            Behavior::Tree => {
                let mut root = Map::new();
                root.insert("source".to_string(), Value::String(self.id.clone()));
                Ok(CollectionResult::tree(root))
            }
            Behavior::Tabular => Ok(CollectionResult::tabular(
                vec!["key".to_string(), "value".to_string()],
                vec![vec![self.id.clone(), "test".to_string()]],
            )),
            Behavior::EmptyTree => Ok(CollectionResult::tree(Map::new())),
            Behavior::EmptyTabular => Ok(CollectionResult::tabular(vec![], vec![])),
            Behavior::Fail(reason) => Err(CollectionError::new(reason.clone())),
            Behavior::Panic => panic!("test source panicked"),
        }
    }
}

/// Recording gate backed by a plain name set.
///
/// Grants can be staged up front, granted later by a test, granted
/// synchronously on runtime request, or granted after a fixed number of
/// failed checks (to exercise the poll loop).
pub struct StaticGate {
    granted: Mutex<HashSet<String>>,
    grant_runtime_on_request: bool,
    grant_after_checks: Option<AtomicU32>,
    runtime_batches: Mutex<Vec<Vec<String>>>,
    special_requests: Mutex<Vec<String>>,
    external_announcements: Mutex<Vec<String>>,
}

impl StaticGate {
    pub fn new() -> Self {
        StaticGate {
            granted: Mutex::new(HashSet::new()),
            grant_runtime_on_request: false,
            grant_after_checks: None,
            runtime_batches: Mutex::new(Vec::new()),
            special_requests: Mutex::new(Vec::new()),
            external_announcements: Mutex::new(Vec::new()),
        }
    }

    pub fn granting(names: &[&str]) -> Self {
        let gate = Self::new();
        {
            let mut granted = gate.granted.lock().unwrap();
            for name in names {
                granted.insert(name.to_string());
            }
        }
        gate
    }

    /// Runtime requests succeed synchronously, like an operator
    /// consenting to the batch.
    pub fn granting_on_request(mut self) -> Self {
        self.grant_runtime_on_request = true;
        self
    }

    /// Not-yet-granted tokens report granted after `checks` failed
    /// checks, simulating a grant landing while the poll loop waits.
    pub fn granting_after_checks(mut self, checks: u32) -> Self {
        self.grant_after_checks = Some(AtomicU32::new(checks));
        self
    }

    pub fn grant(&self, name: &str) {
        self.granted.lock().unwrap().insert(name.to_string());
    }

    pub fn runtime_batches(&self) -> Vec<Vec<String>> {
        self.runtime_batches.lock().unwrap().clone()
    }

    pub fn special_requests(&self) -> Vec<String> {
        self.special_requests.lock().unwrap().clone()
    }

    pub fn external_announcements(&self) -> Vec<String> {
        self.external_announcements.lock().unwrap().clone()
    }
}

impl AuthorizationGate for StaticGate {
    fn check_granted(&self, token: &AuthorizationToken) -> bool {
        if self.granted.lock().unwrap().contains(&token.name) {
            return true;
        }
        if let Some(countdown) = &self.grant_after_checks {
            if countdown.load(Ordering::SeqCst) == 0 {
                return true;
            }
            countdown.fetch_sub(1, Ordering::SeqCst);
        }
        false
    }

    fn request_runtime_grants(&self, tokens: &[AuthorizationToken]) {
        let names: Vec<String> = tokens.iter().map(|t| t.name.clone()).collect();
        if self.grant_runtime_on_request {
            let mut granted = self.granted.lock().unwrap();
            for name in &names {
                granted.insert(name.clone());
            }
        }
        self.runtime_batches.lock().unwrap().push(names);
    }

    fn request_special_grant(&self, token: &AuthorizationToken) {
        self.special_requests.lock().unwrap().push(token.name.clone());
    }

    fn announce_external_grant(&self, token: &AuthorizationToken) {
        self.external_announcements.lock().unwrap().push(token.name.clone());
    }
}
