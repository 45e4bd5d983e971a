use crate::authorization::AuthorizationToken;
use crate::sources::Source;

/// Host-side grant surface the framework checks and requests through.
///
/// Check methods must be cheap; they are called once per token on every
/// readiness evaluation. Request methods are fire-and-forget: grants
/// that land asynchronously are picked up by the poll loop in
/// [`request`](crate::authorization::request).
pub trait AuthorizationGate: Send + Sync {
    /// Whether the platform currently holds the grant. `ExternalOnly`
    /// tokens report granted only once externally confirmed.
    fn check_granted(&self, token: &AuthorizationToken) -> bool;

    /// One batched request for every missing `Runtime` token.
    fn request_runtime_grants(&self, tokens: &[AuthorizationToken]);

    /// Dedicated request surface for `SpecialGrant` and `DeviceAdmin`
    /// tokens, one call per token.
    fn request_special_grant(&self, token: &AuthorizationToken);

    /// Surfaces the out-of-band step an operator must perform for an
    /// `ExternalOnly` token. Never grants anything itself.
    fn announce_external_grant(&self, token: &AuthorizationToken);

    /// Required tokens of `source` not currently granted. Optional
    /// tokens never appear here.
    fn missing_required(&self, source: &dyn Source) -> Vec<AuthorizationToken> {
        source
            .required_authorizations()
            .into_iter()
            .filter(|t| !t.optional && !self.check_granted(t))
            .collect()
    }

    /// Whether `source` holds everything it needs to run.
    fn satisfies(&self, source: &dyn Source) -> bool {
        self.missing_required(source).is_empty()
    }
}
