//! HS256 access-token codec.
//!
//! Issuance and validation share one secret and one claim layout, so a token
//! written by `issue` is readable by `validate` without a second trust store.
//! No I/O happens here; the only shared state is the immutable key pair.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature does not match")]
    SignatureInvalid,
    #[error("token issued by an unexpected issuer")]
    InvalidIssuer,
    #[error("token expired")]
    Expired,
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("token lifetime out of range")]
    InvalidTtl,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    default_ttl: Duration,
    leeway_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("default_ttl", &self.default_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        default_ttl: Duration,
        leeway_seconds: u64,
    ) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["iss", "sub", "exp"]);
        // Expiry is checked after decoding so that "at or before now" is exact
        // and only ever reported once the signature is known to be good.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            default_ttl,
            leeway_seconds: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    ///
    /// A negative `ttl` produces a token that is already expired. A `ttl` that
    /// pushes the expiry past the representable date range is `InvalidTtl`.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidTtl)?;
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign access token");
            TokenError::Signing(e.to_string())
        })
    }

    /// Issue with the configured default lifetime (what the login flow calls).
    pub fn issue_default(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.default_ttl)
    }

    /// Verify a token and return the subject it was issued for.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        let now = Utc::now().timestamp();
        if claims.exp.saturating_add(self.leeway_seconds) <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}
