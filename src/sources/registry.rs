use std::collections::HashSet;
use std::sync::Arc;

use crate::sources::Source;

/// Ordered set of sources assembled by the host for one session.
///
/// Registration order is preserved for reporting; execution order
/// within a batch is unspecified.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        SourceRegistry { sources: Vec::new() }
    }

    pub fn register(&mut self, source: Arc<dyn Source>) -> &mut Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Ids registered more than once. Each id maps to exactly one artifact
    /// file, so duplicates would make two jobs contend for the same path;
    /// the runner refuses such a registry.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for source in &self.sources {
            if !seen.insert(source.id()) && !duplicates.iter().any(|d| d == source.id()) {
                duplicates.push(source.id().to_string());
            }
        }
        duplicates
    }

    /// Subset containing only the named ids, in registry order.
    pub fn filtered(&self, ids: &[&str]) -> SourceRegistry {
        let wanted: HashSet<&str> = ids.iter().copied().collect();
        SourceRegistry {
            sources: self
                .sources
                .iter()
                .filter(|s| wanted.contains(s.id()))
                .cloned()
                .collect(),
        }
    }
}
