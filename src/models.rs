// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! Request fields also accept the legacy Portuguese names (`titulo`,
//! `mensagem`, `nomeCurso`, `senha`, `nome`) sent by older clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::forum::{NewTopic, RegisterUser, Topic, TopicPatch, TopicStatus, User};

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register a new user.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub login: String,
    #[serde(alias = "senha")]
    pub password: String,
    #[serde(alias = "nome")]
    pub name: String,
    pub email: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            login: request.login,
            password: request.password,
            name: request.name,
            email: request.email,
        }
    }
}

/// Request to exchange credentials for a token.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    #[serde(alias = "senha")]
    pub password: String,
}

/// Bearer token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Public profile of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub login: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            login: user.login,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Response after registering.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub message: String,
}

// =============================================================================
// Topic Models
// =============================================================================

/// Request to create a topic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "mensagem")]
    pub body: String,
    /// Course name; created on first use
    #[serde(alias = "nomeCurso")]
    pub course: String,
}

impl From<CreateTopicRequest> for NewTopic {
    fn from(request: CreateTopicRequest) -> Self {
        Self {
            title: request.title,
            body: request.body,
            course_name: request.course,
        }
    }
}

/// Partial update of a topic. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTopicRequest {
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
    #[serde(default, alias = "mensagem")]
    pub body: Option<String>,
    /// One of `UNANSWERED`, `UNSOLVED`, `SOLVED`, `CLOSED` (any case)
    #[serde(default)]
    pub status: Option<String>,
}

impl From<UpdateTopicRequest> for TopicPatch {
    fn from(request: UpdateTopicRequest) -> Self {
        Self {
            title: request.title,
            body: request.body,
            status: request.status,
        }
    }
}

/// A topic as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub status: TopicStatus,
    /// Login of the author
    pub author: String,
    pub course: String,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            title: topic.title,
            body: topic.body,
            created_at: topic.created_at,
            status: topic.status,
            author: topic.author_login,
            course: topic.course_name,
        }
    }
}
