// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ForumHub - Course Discussion Forum Service
//!
//! Users register, log in for a stateless bearer token, and open discussion
//! topics under a course. Only a topic's author may change or delete it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance and verification, password hashing
//! - `forum` - Domain records, topic status rules and the author-only policy
//! - `storage` - Embedded redb database

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forum;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
