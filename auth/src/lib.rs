//! Authentication utilities library
//!
//! Provides the authentication building blocks used by the stores API:
//! - Password hashing (Argon2id)
//! - JWT access/refresh token issuance and validation
//! - Token revocation through an in-process blocklist
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialStore;
//!
//! let store = CredentialStore::new();
//! let hash = store.hash("my_password").unwrap();
//! assert!(store.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Login, refresh and logout
//! ```
//! use auth::{Authenticator, TokenError, TokenRequirement};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint a fresh access token and a refresh token
//! let pair = auth.login("password123", &hash, 1, false).unwrap();
//! let claims = auth.validate(&pair.access_token, TokenRequirement::FreshAccess).unwrap();
//!
//! // Refresh: single use
//! let refresh = auth.validate(&pair.refresh_token, TokenRequirement::Refresh).unwrap();
//! let _access = auth.refresh(&refresh).unwrap();
//! assert_eq!(
//!     auth.validate(&pair.refresh_token, TokenRequirement::Refresh),
//!     Err(TokenError::Revoked)
//! );
//!
//! // Logout: revoke the access token
//! auth.revoke(&claims);
//! assert!(auth.validate(&pair.access_token, TokenRequirement::Access).is_err());
//! ```

pub mod authenticator;
pub mod blocklist;
pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use blocklist::Blocklist;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenKind;
pub use password::CredentialStore;
pub use password::PasswordError;
pub use tokens::TokenError;
pub use tokens::TokenIssuer;
pub use tokens::TokenPair;
pub use tokens::TokenRequirement;
