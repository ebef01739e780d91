//! JWT session tokens
//!
//! Provides token encoding, decoding, and organization re-issue using the
//! `jsonwebtoken` crate.

use chrono::{Duration, Utc};
use hazel_core::AuthError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Identity provider's id of the active organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Optional session ID for tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Claims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT service for encoding and decoding access tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry in seconds
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.access_token_expiry)
    }

    /// Issue an access token for `subject`
    pub fn issue(
        &self,
        subject: &str,
        org_id: Option<String>,
        session_id: Option<String>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            org_id,
            session_id,
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Provider(format!("failed to encode token: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// Re-issue `token` with `org_id` as the active organization.
    ///
    /// Subject and session carry over; issue and expiry times restart.
    pub fn reissue_for_organization(&self, token: &str, org_id: &str) -> Result<String, AuthError> {
        let claims = self.decode_token(token)?;
        self.issue(&claims.sub, Some(org_id.to_string()), claims.session_id)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900)
    }

    #[test]
    fn test_issue_and_decode() {
        let service = create_test_service();
        let token = service
            .issue("12345", None, Some("session-123".to_string()))
            .unwrap();

        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "12345");
        assert_eq!(claims.org_id, None);
        assert_eq!(claims.session_id.as_deref(), Some("session-123"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_from_config_uses_configured_expiry() {
        let config = crate::AppConfig::from_toml_str(
            "[database]\nurl = \"postgres://localhost/hazel\"\n\
             [auth]\njwt_secret = \"configured-secret\"\naccess_token_expiry = 60\n",
        )
        .unwrap();
        let service = JwtService::from_config(config.auth().unwrap());

        let claims = service
            .decode_token(&service.issue("12345", None, None).unwrap())
            .unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
        assert!(create_test_service()
            .decode_token(&service.issue("12345", None, None).unwrap())
            .is_err());
    }

    #[test]
    fn test_reissue_sets_organization() {
        let service = create_test_service();
        let token = service
            .issue("12345", Some("org_old".to_string()), Some("s1".to_string()))
            .unwrap();

        let token = service.reissue_for_organization(&token, "org_new").unwrap();
        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "12345");
        assert_eq!(claims.org_id.as_deref(), Some("org_new"));
        assert_eq!(claims.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(matches!(
            service.decode_token("invalid.token.here"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_test_service().issue("1", None, None).unwrap();
        let other = JwtService::new("another-secret", 900);
        assert!(matches!(
            other.decode_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        // Past the default 60s leeway
        let service = JwtService::new("test-secret-key-that-is-long-enough", -120);
        let token = service.issue("1", None, None).unwrap();
        assert!(matches!(
            service.decode_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }
}
