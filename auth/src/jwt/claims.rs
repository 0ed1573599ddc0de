use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Kind of token, carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Payload of every token minted by this crate.
///
/// `jti` is unique per token and is the key used by the blocklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,

    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Issued directly from a password login
    pub fresh: bool,

    pub is_admin: bool,
}

impl Claims {
    /// Build claims for a new access token.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is bound to
    /// * `is_admin` - Admin claim copied from the user record
    /// * `fresh` - Whether the token comes straight from a login
    /// * `lifetime` - Time until expiry
    pub fn access(subject: impl ToString, is_admin: bool, fresh: bool, lifetime: Duration) -> Self {
        Self::build(subject, is_admin, TokenKind::Access, fresh, lifetime)
    }

    /// Build claims for a new refresh token. Refresh tokens are never fresh.
    pub fn refresh(subject: impl ToString, is_admin: bool, lifetime: Duration) -> Self {
        Self::build(subject, is_admin, TokenKind::Refresh, false, lifetime)
    }

    fn build(
        subject: impl ToString,
        is_admin: bool,
        kind: TokenKind,
        fresh: bool,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
            fresh,
            is_admin,
        }
    }

    /// Override expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
