//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest, User},
};

use super::AuthenticatedUser;

/// Token response
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub token: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid input or user already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let token = state.services.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.users.login(&request).await?;
    Ok(Json(TokenResponse { token }))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}
