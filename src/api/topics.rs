// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Topic endpoints.
//!
//! Reading is public. Creating requires a bearer token, and only a topic's
//! author may update or delete it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    forum::TopicPatch,
    models::{CreateTopicRequest, TopicResponse, UpdateTopicRequest},
    state::AppState,
};

/// Response containing all topics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicListResponse {
    /// Topics, oldest first.
    pub topics: Vec<TopicResponse>,
    pub total: usize,
}

/// List all topics.
#[utoipa::path(
    get,
    path = "/topics",
    tag = "Topics",
    responses(
        (status = 200, description = "List of topics", body = TopicListResponse)
    )
)]
pub async fn list_topics(
    State(state): State<AppState>,
) -> Result<Json<TopicListResponse>, ApiError> {
    let topics: Vec<TopicResponse> = state
        .forum
        .list_topics()?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = topics.len();

    Ok(Json(TopicListResponse { topics, total }))
}

/// Create a topic authored by the caller.
///
/// The course is created on first use. A topic with the same title and body
/// as an existing one is rejected.
#[utoipa::path(
    post,
    path = "/topics",
    tag = "Topics",
    security(("bearer_auth" = [])),
    request_body = CreateTopicRequest,
    responses(
        (status = 201, description = "Topic created", body = TopicResponse),
        (status = 400, description = "Missing title, body or course"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Author no longer exists"),
        (status = 409, description = "Duplicate title and body")
    )
)]
pub async fn create_topic(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    let topic = state.forum.create_topic(request.into(), &user.login)?;
    Ok((StatusCode::CREATED, Json(topic.into())))
}

/// Get a topic by ID.
#[utoipa::path(
    get,
    path = "/topics/{topic_id}",
    tag = "Topics",
    params(
        ("topic_id" = String, Path, description = "Topic ID")
    ),
    responses(
        (status = 200, description = "Topic details", body = TopicResponse),
        (status = 404, description = "Topic not found")
    )
)]
pub async fn get_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<Json<TopicResponse>, ApiError> {
    let topic = state.forum.get_topic(&topic_id)?;
    Ok(Json(topic.into()))
}

/// Update a topic's title, body or status.
///
/// Blank fields are ignored. An unknown status rejects the whole update.
#[utoipa::path(
    put,
    path = "/topics/{topic_id}",
    tag = "Topics",
    security(("bearer_auth" = [])),
    params(
        ("topic_id" = String, Path, description = "Topic ID")
    ),
    request_body = UpdateTopicRequest,
    responses(
        (status = 200, description = "Updated topic", body = TopicResponse),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the author"),
        (status = 404, description = "Topic not found")
    )
)]
pub async fn update_topic(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(request): Json<UpdateTopicRequest>,
) -> Result<Json<TopicResponse>, ApiError> {
    let patch = TopicPatch::from(request);
    let topic = state.forum.update_topic(&topic_id, &patch, &user.login)?;
    Ok(Json(topic.into()))
}

/// Delete a topic.
#[utoipa::path(
    delete,
    path = "/topics/{topic_id}",
    tag = "Topics",
    security(("bearer_auth" = [])),
    params(
        ("topic_id" = String, Path, description = "Topic ID")
    ),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the author"),
        (status = 404, description = "Topic not found")
    )
)]
pub async fn delete_topic(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.forum.delete_topic(&topic_id, &user.login)?;
    Ok(StatusCode::NO_CONTENT)
}
