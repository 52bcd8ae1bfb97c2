// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Forum Storage
//!
//! Persistent storage for users, courses and topics in a single embedded
//! redb file under the data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   forumhub.redb   # users, courses, topics tables
//! ```
//!
//! ## Atomicity
//!
//! Every create, update and delete runs inside one redb write transaction.
//! redb serializes writers, so two mutations of the same topic never
//! interleave: the last one to commit wins.

pub mod database;

pub use database::{ForumDatabase, StoreError, StoreResult, WriteSession, DATABASE_FILE};
