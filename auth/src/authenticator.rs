use std::sync::Arc;
use std::sync::OnceLock;

use chrono::Duration;

use crate::blocklist::Blocklist;
use crate::jwt::Claims;
use crate::password::CredentialStore;
use crate::password::PasswordError;
use crate::tokens::TokenError;
use crate::tokens::TokenIssuer;
use crate::tokens::TokenPair;
use crate::tokens::TokenRequirement;

/// Plaintext behind the digest that unknown usernames are checked against.
const DECOY_PASSWORD: &str = "decoy password for unknown identities";

/// Authentication coordinator combining password verification, token issuance
/// and revocation.
pub struct Authenticator {
    credentials: CredentialStore,
    issuer: TokenIssuer,
    decoy_digest: OnceLock<String>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator with its own, empty blocklist.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_blocklist(jwt_secret, Arc::new(Blocklist::new()))
    }

    /// Create an authenticator sharing an existing blocklist.
    pub fn with_blocklist(jwt_secret: &[u8], blocklist: Arc<Blocklist>) -> Self {
        Self {
            credentials: CredentialStore::new(),
            issuer: TokenIssuer::new(jwt_secret, blocklist),
            decoy_digest: OnceLock::new(),
        }
    }

    /// Override the default access/refresh lifetimes.
    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.issuer = self.issuer.with_lifetimes(access, refresh);
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Empty password or hashing failure
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.credentials.hash(password)
    }

    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.credentials.verify(password, stored_hash)
    }

    /// Verify credentials and mint a fresh access token plus a refresh token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password digest
    /// * `identity` - Subject for both tokens
    /// * `is_admin` - Admin claim for both tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest is unusable
    /// * `TokenError` - Token generation failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        identity: impl ToString,
        is_admin: bool,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.credentials.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let identity = identity.to_string();

        Ok(TokenPair {
            access_token: self.issuer.issue_access(&identity, is_admin, true)?,
            refresh_token: self.issuer.issue_refresh(&identity, is_admin)?,
        })
    }

    /// Fail a login whose identity does not exist, after the same Argon2
    /// verification a wrong password costs.
    ///
    /// The decoy digest is hashed on first use and reused afterwards.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let digest = self
            .decoy_digest
            .get_or_init(|| self.credentials.hash(DECOY_PASSWORD).unwrap_or_default());

        let _ = self.credentials.verify(password, digest);
        AuthenticationError::InvalidCredentials
    }

    /// Exchange a validated refresh token for a non-fresh access token.
    ///
    /// The refresh token's id is revoked, so each refresh token works once.
    pub fn refresh(&self, refresh_claims: &Claims) -> Result<String, TokenError> {
        let access_token =
            self.issuer
                .issue_access(&refresh_claims.sub, refresh_claims.is_admin, false)?;
        self.issuer.revoke(refresh_claims);
        Ok(access_token)
    }

    /// Revoke the token described by `claims`.
    pub fn revoke(&self, claims: &Claims) {
        self.issuer.revoke(claims);
    }

    /// Validate a presented token for the given route requirement.
    pub fn validate(&self, token: &str, requirement: TokenRequirement) -> Result<Claims, TokenError> {
        self.issuer.validate(token, requirement)
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
