// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Forum Domain
//!
//! Users, courses and discussion topics, plus the rules that govern them:
//!
//! - `model` - domain records and the topic update rules
//! - `status` - the topic status state machine
//! - `ownership` - author-only mutation policy
//! - `service` - operations composed over the store, one write transaction each

pub mod model;
pub mod ownership;
pub mod service;
pub mod status;

pub use model::{Course, NewTopic, RegisterUser, Topic, TopicPatch, User};
pub use ownership::{can_mutate, OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use service::ForumService;
pub use status::TopicStatus;

use crate::storage::StoreError;

/// Errors returned by forum operations.
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    /// Login/password mismatch (unknown login included)
    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("login '{0}' is already in use")]
    DuplicateLogin(String),

    #[error("a topic with the same title and body already exists")]
    DuplicateTopic,

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Authenticated, but not the author of the resource
    #[error("user {login} is not the author of {resource} {id}")]
    Unauthorized {
        login: String,
        resource: &'static str,
        id: String,
    },

    #[error("invalid topic status: {0}")]
    InvalidStatus(String),

    #[error("{0}")]
    Validation(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ForumError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ForumError::NotFound {
            resource,
            id: id.into(),
        }
    }
}

pub type ForumResult<T> = Result<T, ForumError>;
