// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `{iss, sub, iat, exp}`. Nothing is stored
//! server-side: validity is recomputed from the signature, the fixed issuer
//! and the clock on every request, so there is no revocation before expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{AuthenticatedUser, TokenClaims};

/// Issuer written into and required from every token.
pub const TOKEN_ISSUER: &str = "forumhub-api";

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// Errors building the service or signing a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing secret is missing or blank")]
    MissingSecret,

    #[error("token lifetime must be between 1 second and {max} seconds", max = MAX_TOKEN_LIFETIME_SECS)]
    InvalidLifetime,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signing configuration, constructed once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric HMAC secret shared by issuance and verification
    pub secret: String,
    /// How long an issued token stays valid
    pub lifetime: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: chrono::Duration,
    validation: Validation,
}

impl TokenService {
    /// Build the service.
    ///
    /// # Errors
    /// `MissingSecret` for a blank secret, `InvalidLifetime` for a zero or
    /// out-of-range lifetime.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let seconds = config.lifetime.as_secs();
        if seconds == 0 || seconds > MAX_TOKEN_LIFETIME_SECS {
            return Err(TokenError::InvalidLifetime);
        }
        let lifetime = i64::try_from(seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(TokenError::InvalidLifetime)?;

        // Expiry is checked against an explicit clock in `verify_at`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let secret = config.secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
            validation,
        })
    }

    /// Issue a token for `login`, valid from now for the configured lifetime.
    pub fn issue(&self, login: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(login, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, login: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::InvalidLifetime)?;
        let claims = TokenClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: login.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
        })
    }

    /// Verify a token against the current time.
    ///
    /// Returns `None` for any bad signature, foreign issuer, expired or
    /// malformed token. Callers treat `None` as unauthenticated.
    pub fn verify(&self, token: &str) -> Option<AuthenticatedUser> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<AuthenticatedUser> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).ok()?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp || claims.sub.is_empty() {
            return None;
        }
        Some(AuthenticatedUser::from_claims(claims))
    }
}
