// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded forum database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: login → serialized User
//! - `courses`: lowercase course name → serialized Course
//! - `topics`: topic id → serialized Topic
//!
//! Every mutation goes through [`ForumDatabase::write`], which runs the whole
//! operation inside one write transaction and commits only on success.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

use crate::forum::{Course, Topic, User};

// =============================================================================
// Table Definitions
// =============================================================================

/// Users: login → JSON bytes.
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Courses: lowercase name → JSON bytes. Lowercase keys give case-insensitive
/// lookup while the stored record keeps the original spelling.
const COURSES: TableDefinition<&str, &[u8]> = TableDefinition::new("courses");

/// Topics: id → JSON bytes.
const TOPICS: TableDefinition<&str, &[u8]> = TableDefinition::new("topics");

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "forumhub.redb";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

fn course_key(name: &str) -> String {
    name.to_lowercase()
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

// =============================================================================
// ForumDatabase
// =============================================================================

/// Embedded ACID forum database.
pub struct ForumDatabase {
    db: Database,
}

impl ForumDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(COURSES)?;
            let _ = write_txn.open_table(TOPICS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open the database file inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> StoreResult<Self> {
        Self::open(&data_dir.join(DATABASE_FILE))
    }

    /// Run `f` inside a single write transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and is aborted when it
    /// returns `Err`, so nothing staged by a failed operation is persisted.
    pub fn write<T, E>(&self, f: impl FnOnce(&WriteSession<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let txn = self.db.begin_write().map_err(StoreError::from)?;
        let outcome = f(&WriteSession { txn: &txn });
        match outcome {
            Ok(value) => {
                txn.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    tracing::warn!(error = %abort_err, "Failed to abort write transaction");
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // Read side
    // =========================================================================

    /// Look up a user by login.
    pub fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let bytes = table.get(login)?.map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    /// Look up a topic by id.
    pub fn find_topic(&self, id: &str) -> StoreResult<Option<Topic>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOPICS)?;
        let bytes = table.get(id)?.map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    /// All topics, oldest first.
    pub fn list_topics(&self) -> StoreResult<Vec<Topic>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOPICS)?;

        let mut topics = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            topics.push(decode::<Topic>(value.value())?);
        }
        topics.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(topics)
    }

    /// Look up a course by name, ignoring case.
    pub fn find_course_by_name_ignore_case(&self, name: &str) -> StoreResult<Option<Course>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COURSES)?;
        let bytes = table
            .get(course_key(name).as_str())?
            .map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(TOPICS)?;
        Ok(())
    }
}

// =============================================================================
// WriteSession
// =============================================================================

/// Typed access to the tables within one write transaction.
pub struct WriteSession<'txn> {
    txn: &'txn WriteTransaction,
}

impl WriteSession<'_> {
    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    pub fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let table = self.txn.open_table(USERS)?;
        let bytes = table.get(login)?.map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    pub fn user_exists(&self, login: &str) -> StoreResult<bool> {
        let table = self.txn.open_table(USERS)?;
        let exists = table.get(login)?.is_some();
        Ok(exists)
    }

    /// Insert or replace a user keyed by login.
    pub fn save_user(&self, user: &User) -> StoreResult<()> {
        let json = encode(user)?;
        let mut table = self.txn.open_table(USERS)?;
        table.insert(user.login.as_str(), json.as_slice())?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Courses
    // ---------------------------------------------------------------------

    pub fn find_course_by_name_ignore_case(&self, name: &str) -> StoreResult<Option<Course>> {
        let table = self.txn.open_table(COURSES)?;
        let bytes = table
            .get(course_key(name).as_str())?
            .map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    pub fn save_course(&self, course: &Course) -> StoreResult<()> {
        let json = encode(course)?;
        let mut table = self.txn.open_table(COURSES)?;
        table.insert(course_key(&course.name).as_str(), json.as_slice())?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Topics
    // ---------------------------------------------------------------------

    pub fn find_topic(&self, id: &str) -> StoreResult<Option<Topic>> {
        let table = self.txn.open_table(TOPICS)?;
        let bytes = table.get(id)?.map(|v| v.value().to_vec());
        bytes.map(|b| decode(&b)).transpose()
    }

    /// Whether any topic has exactly this (title, body) pair.
    pub fn topic_exists_with_content(&self, title: &str, body: &str) -> StoreResult<bool> {
        let table = self.txn.open_table(TOPICS)?;
        for entry in table.iter()? {
            let (_, value) = entry?;
            let topic: Topic = decode(value.value())?;
            if topic.title == title && topic.body == body {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Insert or replace a topic keyed by id.
    pub fn save_topic(&self, topic: &Topic) -> StoreResult<()> {
        let json = encode(topic)?;
        let mut table = self.txn.open_table(TOPICS)?;
        table.insert(topic.id.as_str(), json.as_slice())?;
        Ok(())
    }

    /// Remove a topic. Authors and courses are left untouched.
    pub fn delete_topic(&self, topic: &Topic) -> StoreResult<bool> {
        let mut table = self.txn.open_table(TOPICS)?;
        let removed = table.remove(topic.id.as_str())?.is_some();
        Ok(removed)
    }
}

// =============================================================================
// Tests
// =============================================================================
