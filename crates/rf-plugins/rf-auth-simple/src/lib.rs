//! # rf-auth-simple
//!
//! JWT (HS256) implementation of `AuthProvider`.
//! Access tokens carry the user id in an `id` claim and expire after the
//! configured lifetime.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rf_core::traits::AuthProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    exp: i64,
}

pub struct SimpleAuthProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SimpleAuthProvider {
    /// `secret` is the signing key (e.g., from the `auth.token_secret` setting).
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mints an access token for `user_id`. Used by account tooling and tests.
    pub fn issue_token(&self, user_id: &str) -> anyhow::Result<String> {
        let claims = Claims {
            id: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("signing access token")
    }
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn authenticate(&self, token: &str) -> anyhow::Result<Option<String>> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.id.is_empty() => Ok(Some(data.claims.id)),
            Ok(_) => Ok(None),
            Err(err) => {
                debug!(error = %err, "rejected bearer token");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates() {
        let auth = SimpleAuthProvider::new("rahasia");
        let token = auth.issue_token("user-123").unwrap();
        assert_eq!(auth.authenticate(&token).await.unwrap().as_deref(), Some("user-123"));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let token = SimpleAuthProvider::new("other").issue_token("user-123").unwrap();
        let auth = SimpleAuthProvider::new("rahasia");
        assert_eq!(auth.authenticate(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let auth = SimpleAuthProvider::new("rahasia").with_ttl(Duration::minutes(-10));
        let token = auth.issue_token("user-123").unwrap();
        assert_eq!(auth.authenticate(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected() {
        let auth = SimpleAuthProvider::new("rahasia");
        let token = auth.issue_token("user-123").unwrap();
        let other = auth.issue_token("user-456").unwrap();

        // header and signature of one token, claims of another
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(auth.authenticate(&forged).await.unwrap(), None);
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let auth = SimpleAuthProvider::new("rahasia");
        for token in ["", "no-dot", "a.b", "a.b.c", "..."] {
            assert_eq!(auth.authenticate(token).await.unwrap(), None, "token {token:?}");
        }
    }
}
