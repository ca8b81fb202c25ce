//! GraphQL mutation resolvers

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, SimpleObject};

use crate::models::{
    book::{Book, CreateBook},
    borrow::BorrowRecord,
    user::{LoginRequest, RegisterRequest},
};

use super::{require_admin, require_user, services};

/// Registration input (always creates a Member)
#[derive(InputObject)]
#[graphql(name = "RegisterInput")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Signed bearer token
#[derive(SimpleObject)]
#[graphql(name = "Token")]
pub struct AuthToken {
    pub token: String,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new member account
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthToken> {
        let token = services(ctx)
            .users
            .register(RegisterRequest {
                name: input.name,
                email: input.email,
                password: input.password,
                role: None,
            })
            .await
            .map_err(|e| e.extend())?;

        Ok(AuthToken { token })
    }

    /// Log in with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthToken> {
        let token = services(ctx)
            .users
            .login(&LoginRequest { email, password })
            .await
            .map_err(|e| e.extend())?;

        Ok(AuthToken { token })
    }

    /// Add a new book (admin only)
    async fn add_book(&self, ctx: &Context<'_>, input: CreateBook) -> Result<Book> {
        require_admin(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .catalog
            .add_book(input)
            .await
            .map_err(|e| e.extend())
    }

    /// Replace an existing book (admin only)
    async fn update_book(&self, ctx: &Context<'_>, id: i32, input: CreateBook) -> Result<Book> {
        require_admin(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .catalog
            .update_book(id, input.into())
            .await
            .map_err(|e| e.extend())
    }

    /// Delete a book (admin only)
    async fn delete_book(&self, ctx: &Context<'_>, id: i32) -> Result<String> {
        require_admin(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .catalog
            .delete_book(id)
            .await
            .map_err(|e| e.extend())?;

        Ok("Book deleted successfully".to_string())
    }

    /// Borrow a book for the authenticated user
    async fn borrow_book(&self, ctx: &Context<'_>, book_id: i32) -> Result<BorrowRecord> {
        let claims = require_user(ctx).map_err(|e| e.extend())?;

        let borrow = services(ctx)
            .lending
            .borrow(claims.user_id, book_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(borrow.into())
    }

    /// Return a borrowed book
    async fn return_book(&self, ctx: &Context<'_>, book_id: i32) -> Result<String> {
        let claims = require_user(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .lending
            .return_book(claims.user_id, book_id)
            .await
            .map_err(|e| e.extend())?;

        Ok("Book returned successfully".to_string())
    }
}
