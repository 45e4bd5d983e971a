//! The source contract and the registry the host assembles.
//!
//! A source is one independently collectable unit: it declares an
//! identity, enablement, and the authorizations it needs, then produces
//! a structured payload on demand. Everything else (state, scheduling,
//! serialization) lives in the runner and the output layer.

/// The `Source` trait and its contract error
pub mod source;

/// Ordered source collection supplied to the runner
pub mod registry;

pub use registry::SourceRegistry;
pub use source::{CollectionError, Source};
