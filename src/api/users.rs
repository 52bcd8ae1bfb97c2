// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{auth::Auth, error::ApiError, models::UserProfile, state::AppState};

/// Get the current authenticated user's profile.
///
/// A valid token for a login that no longer exists yields 404.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.forum.find_user(&user.login)?;
    Ok(Json(profile.into()))
}
