//! JWT Token Service
//! Mission: Issue and verify signed, time-limited bearer tokens

use crate::auth::models::Claims;
use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;
use uuid::Uuid;

/// Longest accepted token lifetime (ten years)
pub const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Why a presented token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64, // seconds until expiration
}

/// Token service holding the process-wide signing key and TTL
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service with a secret key and token lifetime in seconds
    pub fn new(secret: &str, ttl_seconds: u64) -> Result<Self> {
        ensure!(
            (1..=MAX_TTL_SECONDS).contains(&ttl_seconds),
            "token lifetime must be between 1 and {} seconds, got {}",
            MAX_TTL_SECONDS,
            ttl_seconds
        );
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .context("Invalid token lifetime")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.num_seconds() as u64
    }

    /// Issue a token for a user, valid for the configured TTL from now
    pub fn issue(&self, subject: Uuid) -> Result<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it were signed at `issued_at`
    pub fn issue_at(&self, subject: Uuid, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        debug!(
            "Issuing token for user {}, expires in {}s",
            subject,
            self.ttl.num_seconds()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to sign token")?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds(),
        })
    }

    /// Verify a token's signature and expiry, returning the subject user id
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        let subject = Uuid::parse_str(&decoded.claims.sub).map_err(|_| TokenError::Malformed)?;

        debug!("Verified token for user {}", subject);

        Ok(subject)
    }
}
