use std::fmt;

use serde::{Serialize, Deserialize};

/// How a token is checked and requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Checkable and requestable through the standard batched grant request
    Runtime,
    /// Needs a dedicated settings surface, one request per token
    SpecialGrant,
    /// Grantable only out-of-band (e.g. a privileged shell); never
    /// requestable in-process
    ExternalOnly,
    /// Administrative enrollment; requested like a special grant
    DeviceAdmin,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TokenKind::Runtime => "runtime",
            TokenKind::SpecialGrant => "special-grant",
            TokenKind::ExternalOnly => "external-only",
            TokenKind::DeviceAdmin => "device-admin",
        };
        write!(f, "{}", label)
    }
}

/// A single access grant a source needs before it can run.
///
/// Immutable value object; equality is structural, but the request
/// protocol deduplicates by `name` alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationToken {
    pub name: String,
    pub kind: TokenKind,
    /// Optional tokens are requested when missing but never block readiness
    pub optional: bool,
}

impl AuthorizationToken {
    pub fn new(name: impl Into<String>, kind: TokenKind) -> Self {
        AuthorizationToken {
            name: name.into(),
            kind,
            optional: false,
        }
    }

    pub fn runtime(name: impl Into<String>) -> Self {
        Self::new(name, TokenKind::Runtime)
    }

    pub fn special(name: impl Into<String>) -> Self {
        Self::new(name, TokenKind::SpecialGrant)
    }

    pub fn external(name: impl Into<String>) -> Self {
        Self::new(name, TokenKind::ExternalOnly)
    }

    pub fn device_admin(name: impl Into<String>) -> Self {
        Self::new(name, TokenKind::DeviceAdmin)
    }

    /// Marks the token as nice-to-have rather than required.
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{} [{}, optional]", self.name, self.kind)
        } else {
            write!(f, "{} [{}]", self.name, self.kind)
        }
    }
}
