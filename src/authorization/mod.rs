//! Authorization tokens, the host grant surface, and the request protocol.
//!
//! Sources declare what they need as [`AuthorizationToken`]s; the host
//! supplies an [`AuthorizationGate`] that knows how to check and request
//! them. The framework never talks to a platform permission surface
//! itself. [`request`] implements the session-level protocol: batch the
//! runtime grants, surface the rest, then wait a bounded time for
//! asynchronous grants to land.

/// Token value object and its kinds
pub mod token;

/// The gate trait the host implements
pub mod gate;

/// Batched request and bounded-poll protocol
pub mod request;

pub use gate::AuthorizationGate;
pub use request::{request_missing_grants, GrantPolicy};
pub use token::{AuthorizationToken, TokenKind};
