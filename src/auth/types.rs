//! Auth configuration types

use crate::types::StringMap;
use chrono::{DateTime, Utc};

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// HTTP Basic authentication. Several ATS vendors pass the API key as the
    /// username with an empty password.
    Basic {
        /// Username
        username: String,
        /// Password
        password: Option<String>,
    },

    /// Fixed custom headers
    CustomHeaders {
        /// Headers to add to each request
        headers: StringMap,
    },

    /// OAuth2 Client Credentials flow
    Oauth2ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
    },
}

impl AuthConfig {
    /// Create a bearer token config
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create a basic auth config with the API key as username and no password
    pub fn basic_api_key(key: impl Into<String>) -> Self {
        Self::Basic {
            username: key.into(),
            password: None,
        }
    }

    /// Create a config with a single custom header
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers = StringMap::new();
        headers.insert(name.into(), value.into());
        Self::CustomHeaders { headers }
    }

    /// Create an OAuth2 client credentials config
    pub fn client_credentials(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::Oauth2ClientCredentials {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_cached_token_not_expired() {
        let token = CachedToken::expires_in("test".to_string(), 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::expires_in("test".to_string(), -100);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_inside_buffer() {
        let token = CachedToken::expires_in("test".to_string(), 10);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_no_expiration() {
        let token = CachedToken::new("test".to_string(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_auth_config_constructors() {
        assert!(matches!(
            AuthConfig::basic_api_key("k"),
            AuthConfig::Basic { ref username, password: None } if username == "k"
        ));
        match AuthConfig::header("Authorization", "Token token=a, user_email=b") {
            AuthConfig::CustomHeaders { headers } => {
                assert_eq!(
                    headers.get("Authorization").map(String::as_str),
                    Some("Token token=a, user_email=b")
                );
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }
}
