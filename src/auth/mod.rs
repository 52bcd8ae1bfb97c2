// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the ForumHub API.
//!
//! ## Auth Flow
//!
//! 1. Client registers, then logs in with login + password
//! 2. Server verifies the Argon2 hash and issues an HS256 token
//!    (`iss = forumhub-api`, `sub = login`, `exp = now + lifetime`)
//! 3. Client sends `Authorization: Bearer <token>` on each request
//! 4. `Auth` extractor verifies signature, issuer and expiry and hands the
//!    login to the handler as the principal
//!
//! Any verification failure is reported as one "invalid or expired" error.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{hash_password, verify_password};
pub use token::{
    IssuedToken, TokenConfig, TokenError, TokenService, MAX_TOKEN_LIFETIME_SECS, TOKEN_ISSUER,
};
