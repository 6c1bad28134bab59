use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Validity window of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 12;

/// Errors produced while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is malformed, its signature does not match, or it has expired.
    #[error("invalid or expired token: {0}")]
    InvalidOrExpired(#[source] jsonwebtoken::errors::Error),
    /// The claims could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Represents the claims encoded within a JWT.
///
/// `payload` is whatever object was handed to [`TokenService::issue`];
/// `iat` and `exp` are added at issuance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// The `email` claim, if the payload carries one.
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }
}

/// Issues and verifies HS256 tokens with a process-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service issuing tokens valid for [`TOKEN_TTL_HOURS`].
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Creates a service with a custom validity window.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Claims are caller-defined, so an `aud` claim is just data.
        validation.validate_aud = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Signs `payload` together with `iat` and `exp`.
    ///
    /// Any `iat` or `exp` keys already present in `payload` are replaced.
    pub fn issue(&self, mut payload: Map<String, Value>) -> Result<String, AuthError> {
        payload.remove("iat");
        payload.remove("exp");

        let now = Utc::now();
        let claims = Claims {
            payload,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Verifies the signature and expiration of `token` and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidOrExpired)
    }
}
