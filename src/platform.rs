//! Host-side authorization for a local command-line session.
//!
//! A headless host has no permission dialogs: runtime and
//! settings-style grants are recorded as consented the moment they are
//! requested, since invoking the tool is the consent. The one grant
//! with real teeth is elevation, checked against the effective uid and
//! obtainable only by relaunching the process elevated.

use std::collections::HashSet;
use std::sync::RwLock;

use log::{info, warn};

use crate::authorization::{AuthorizationGate, AuthorizationToken, TokenKind};
use crate::constants::ELEVATED_TOKEN_NAME;

/// Check if the process is running with elevated privileges
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Get instructions for elevating privileges on the current platform
pub fn get_elevation_instructions() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "Run as Administrator by right-clicking the executable and selecting 'Run as administrator'"
    }
    #[cfg(not(target_os = "windows"))]
    {
        "Run with sudo: 'sudo autosweep'"
    }
}

/// The elevation token built-in sources attach when they benefit from
/// running as root.
pub fn elevated_token() -> AuthorizationToken {
    AuthorizationToken::external(ELEVATED_TOKEN_NAME)
}

/// [`AuthorizationGate`] for local sessions.
#[derive(Default)]
pub struct PlatformGate {
    consented: RwLock<HashSet<String>>,
}

impl PlatformGate {
    pub fn new() -> Self {
        PlatformGate {
            consented: RwLock::new(HashSet::new()),
        }
    }

    fn record_consent(&self, token: &AuthorizationToken) {
        if let Ok(mut consented) = self.consented.write() {
            consented.insert(token.name.clone());
        }
    }
}

impl AuthorizationGate for PlatformGate {
    fn check_granted(&self, token: &AuthorizationToken) -> bool {
        match token.kind {
            TokenKind::ExternalOnly => {
                // Only elevation is verifiable out-of-band on a local host
                token.name == ELEVATED_TOKEN_NAME && is_elevated()
            }
            TokenKind::Runtime | TokenKind::SpecialGrant | TokenKind::DeviceAdmin => self
                .consented
                .read()
                .map(|consented| consented.contains(&token.name))
                .unwrap_or(false),
        }
    }

    fn request_runtime_grants(&self, tokens: &[AuthorizationToken]) {
        for token in tokens {
            self.record_consent(token);
        }
        let names: Vec<&str> = tokens.iter().map(|t| t.name.as_str()).collect();
        info!("Granted runtime token(s): {}", names.join(", "));
    }

    fn request_special_grant(&self, token: &AuthorizationToken) {
        self.record_consent(token);
        info!("Granted {} token: {}", token.kind, token.name);
    }

    fn announce_external_grant(&self, token: &AuthorizationToken) {
        if token.name == ELEVATED_TOKEN_NAME {
            warn!(
                "Source(s) want elevated privileges. {}",
                get_elevation_instructions()
            );
        } else {
            warn!(
                "Token {} must be granted outside this process",
                token.name
            );
        }
    }
}
