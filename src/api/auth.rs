// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.
//!
//! Both are public. Login exchanges a login/password pair for a bearer token
//! signed by the shared [`crate::auth::TokenService`].

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    forum::ForumResult,
    models::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
    state::AppState,
};

/// Run a password-hashing forum call off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ForumResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        ApiError::internal("Internal server error")
    })?;
    Ok(result?)
}

/// Register a new user.
///
/// The password is stored as an argon2 hash and never returned.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Login already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let forum = state.forum.clone();
    let user = run_blocking(move || forum.register(request.into())).await?;

    let response = RegisterResponse {
        user: user.into(),
        message: "User registered successfully".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid login or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let forum = state.forum.clone();
    let user =
        run_blocking(move || forum.authenticate(&request.login, &request.password)).await?;

    let issued = state.tokens.issue(&user.login).map_err(|e| {
        tracing::error!(login = %user.login, error = %e, "Failed to sign token");
        ApiError::internal("Internal server error")
    })?;

    Ok(Json(TokenResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    fn register_request(login: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.to_string(),
            password: "correct horse".to_string(),
            name: "Alice".to_string(),
            email: format!("{login}@example.com"),
        }
    }

    #[tokio::test]
    async fn register_returns_created_profile() {
        let (state, _temp_dir) = test_state();

        let (status, Json(body)) = register(State(state), Json(register_request("alice")))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.user.login, "alice");
        assert_eq!(body.user.email, "alice@example.com");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_runs_off_the_async_worker() {
        let (state, _temp_dir) = test_state();
        let worker = std::thread::current().id();

        let hashed_on = run_blocking(|| {
            crate::auth::hash_password("pw")
                .map_err(|e| crate::forum::ForumError::PasswordHash(e.to_string()))?;
            Ok(std::thread::current().id())
        })
        .await
        .unwrap();
        assert_ne!(hashed_on, worker);

        // The runtime stays usable for other handlers afterwards
        let (status, _) = register(State(state), Json(register_request("alice")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let (state, _temp_dir) = test_state();
        register(State(state.clone()), Json(register_request("alice")))
            .await
            .unwrap();

        let err = register(State(state), Json(register_request("alice")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let (state, _temp_dir) = test_state();
        register(State(state.clone()), Json(register_request("alice")))
            .await
            .unwrap();

        let Json(token) = login(
            State(state.clone()),
            Json(LoginRequest {
                login: "alice".to_string(),
                password: "correct horse".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(token.token_type, "Bearer");
        let user = state.tokens.verify(&token.token).unwrap();
        assert_eq!(user.login, "alice");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_login_alike() {
        let (state, _temp_dir) = test_state();
        register(State(state.clone()), Json(register_request("alice")))
            .await
            .unwrap();

        let wrong_password = login(
            State(state.clone()),
            Json(LoginRequest {
                login: "alice".to_string(),
                password: "battery staple".to_string(),
            }),
        )
        .await
        .unwrap_err();

        let unknown = login(
            State(state),
            Json(LoginRequest {
                login: "mallory".to_string(),
                password: "correct horse".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message, unknown.message);
    }
}
