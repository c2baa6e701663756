//! Authentication module
//!
//! Supports: Bearer, Basic, Custom Headers, OAuth2 client credentials
//!
//! The `Authenticator` turns an `AuthConfig` into the header map attached to
//! every request and caches tokens for auth types that need a token exchange.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken};
