use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use crate::blocklist::Blocklist;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenKind;

/// What a route expects from the presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequirement {
    Access,
    FreshAccess,
    Refresh,
}

impl TokenRequirement {
    fn kind(self) -> TokenKind {
        match self {
            TokenRequirement::Access | TokenRequirement::FreshAccess => TokenKind::Access,
            TokenRequirement::Refresh => TokenKind::Refresh,
        }
    }
}

/// Reasons a token is refused. Each maps to a stable machine-readable code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Request does not contain an access token.")]
    Missing,

    #[error("Signature verification failed.")]
    Invalid(String),

    #[error("Only {expected} tokens are allowed.")]
    WrongKind { expected: TokenKind },

    #[error("The token has expired.")]
    Expired,

    #[error("The token has been revoked.")]
    Revoked,

    #[error("The token is not fresh.")]
    NotFresh,

    #[error("Failed to issue token: {0}")]
    Issue(String),
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Missing => "authorization_required",
            TokenError::Invalid(_) | TokenError::WrongKind { .. } => "invalid_token",
            TokenError::Expired => "token_expired",
            TokenError::Revoked => "token_revoked",
            TokenError::NotFresh => "fresh_token_required",
            TokenError::Issue(_) => "internal_error",
        }
    }
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => TokenError::Expired,
            JwtError::InvalidToken(msg) => TokenError::Invalid(msg),
            JwtError::EncodingFailed(msg) => TokenError::Issue(msg),
        }
    }
}

/// Access/refresh pair handed out at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints tokens and decides whether a presented token is acceptable.
///
/// Validation consults the shared blocklist on every call.
pub struct TokenIssuer {
    jwt: JwtHandler,
    blocklist: Arc<Blocklist>,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    pub const DEFAULT_ACCESS_MINUTES: i64 = 15;
    pub const DEFAULT_REFRESH_DAYS: i64 = 30;

    pub fn new(secret: &[u8], blocklist: Arc<Blocklist>) -> Self {
        Self {
            jwt: JwtHandler::new(secret),
            blocklist,
            access_lifetime: Duration::minutes(Self::DEFAULT_ACCESS_MINUTES),
            refresh_lifetime: Duration::days(Self::DEFAULT_REFRESH_DAYS),
        }
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_lifetime = access;
        self.refresh_lifetime = refresh;
        self
    }

    pub fn issue_access(
        &self,
        identity: impl ToString,
        is_admin: bool,
        fresh: bool,
    ) -> Result<String, TokenError> {
        let claims = Claims::access(identity, is_admin, fresh, self.access_lifetime);
        Ok(self.jwt.encode(&claims)?)
    }

    pub fn issue_refresh(&self, identity: impl ToString, is_admin: bool) -> Result<String, TokenError> {
        let claims = Claims::refresh(identity, is_admin, self.refresh_lifetime);
        Ok(self.jwt.encode(&claims)?)
    }

    /// Validate a token against a route requirement.
    ///
    /// Checks run in order: signature and format, expiry, token kind, revocation,
    /// freshness. The first failure wins.
    pub fn validate(&self, token: &str, requirement: TokenRequirement) -> Result<Claims, TokenError> {
        let claims = self.jwt.decode(token)?;

        if claims.kind != requirement.kind() {
            return Err(TokenError::WrongKind {
                expected: requirement.kind(),
            });
        }

        if self.blocklist.contains(&claims.jti) {
            return Err(TokenError::Revoked);
        }

        if requirement == TokenRequirement::FreshAccess && !claims.fresh {
            return Err(TokenError::NotFresh);
        }

        Ok(claims)
    }

    /// Put a token's id on the blocklist.
    pub fn revoke(&self, claims: &Claims) {
        self.blocklist.add(claims.jti.clone());
    }
}
