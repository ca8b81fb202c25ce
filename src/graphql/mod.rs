//! GraphQL façade over the same services as the REST API

pub mod mutation;
pub mod query;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
};

use crate::{error::AppError, models::user::UserClaims, services::Services, AppState};

pub type AppSchema = Schema<query::QueryRoot, mutation::MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with service access
pub fn build_schema(services: Arc<Services>) -> AppSchema {
    Schema::build(query::QueryRoot, mutation::MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

/// Authentication state, parsed once per request from the Authorization
/// header. Resolvers that need identity call `require_user`; `register` and
/// `login` are the only resolvers that never do.
#[derive(Debug, Clone)]
pub enum AuthState {
    Anonymous,
    Authenticated(UserClaims),
    InvalidToken,
}

impl AuthState {
    pub fn from_header(header: Option<&str>, secret: &str) -> Self {
        let Some(header) = header else {
            return AuthState::Anonymous;
        };
        let Some(token) = header.strip_prefix("Bearer ") else {
            return AuthState::InvalidToken;
        };
        match UserClaims::from_token(token, secret) {
            Ok(claims) => AuthState::Authenticated(claims),
            Err(_) => AuthState::InvalidToken,
        }
    }

    /// Resolve the authenticated user, or fail with UNAUTHORIZED
    pub fn require_user(&self) -> Result<&UserClaims, AppError> {
        match self {
            AuthState::Authenticated(claims) => Ok(claims),
            AuthState::Anonymous => Err(AppError::Unauthorized("Access denied".to_string())),
            AuthState::InvalidToken => Err(AppError::Unauthorized("Invalid token".to_string())),
        }
    }
}

/// Fetch the authenticated user from the request context
pub(crate) fn require_user<'a>(ctx: &Context<'a>) -> Result<&'a UserClaims, AppError> {
    ctx.data_unchecked::<AuthState>().require_user()
}

/// Fetch the authenticated user and require the Admin role
pub(crate) fn require_admin<'a>(ctx: &Context<'a>) -> Result<&'a UserClaims, AppError> {
    let claims = require_user(ctx)?;
    claims.require_admin()?;
    Ok(claims)
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> &'a Arc<Services> {
    ctx.data_unchecked::<Arc<Services>>()
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        match self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::warn!(code = self.code().as_str(), "GraphQL request failed: {}", self),
        }
        async_graphql::Error::new(self.public_message())
            .extend_with(|_, e| e.set("code", self.code().as_str()))
    }
}

/// Axum handler for the GraphQL endpoint
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let auth = AuthState::from_header(
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
        &state.config.auth.jwt_secret,
    );

    state.schema.execute(req.into_inner().data(auth)).await.into()
}
