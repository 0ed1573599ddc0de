pub mod credentials;
pub mod errors;

pub use credentials::CredentialStore;
pub use errors::PasswordError;
