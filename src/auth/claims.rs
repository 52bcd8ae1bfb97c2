// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};

/// Claims carried by every ForumHub token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Issuer, always [`super::token::TOKEN_ISSUER`]
    pub iss: String,

    /// Subject: the user's login
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user extracted from a verified token.
///
/// This is the principal handed to handlers; `login` is what ownership checks
/// compare against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Login of the token subject
    pub login: String,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            login: claims.sub,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_login_and_expiry() {
        let claims = TokenClaims {
            iss: "forumhub-api".to_string(),
            sub: "alice".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_007_200,
        };
        let user = AuthenticatedUser::from_claims(claims);
        assert_eq!(user.login, "alice");
        assert_eq!(user.expires_at, 1_700_007_200);
    }
}
