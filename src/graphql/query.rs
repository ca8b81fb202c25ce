//! GraphQL query resolvers

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    models::{book::Book, borrow::BorrowRecord, user::User},
    services::reports::AvailabilityReport,
};

use super::{require_user, services};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// List books, optionally filtered by genre and author
    async fn books(
        &self,
        ctx: &Context<'_>,
        genre: Option<String>,
        author: Option<String>,
    ) -> Result<Vec<Book>> {
        require_user(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .catalog
            .list_books(genre.as_deref(), author.as_deref())
            .await
            .map_err(|e| e.extend())
    }

    /// Full borrowing history of the authenticated user
    async fn borrow_history(&self, ctx: &Context<'_>) -> Result<Vec<BorrowRecord>> {
        let claims = require_user(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .lending
            .history(claims.user_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Most borrowed books over the full ledger history
    async fn most_borrowed_books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        require_user(ctx).map_err(|e| e.extend())?;

        let entries = services(ctx)
            .reports
            .most_borrowed(None)
            .await
            .map_err(|e| e.extend())?;

        Ok(entries.into_iter().map(|e| e.book).collect())
    }

    /// Members ranked by all-time borrow count
    async fn active_members(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        require_user(ctx).map_err(|e| e.extend())?;

        let entries = services(ctx)
            .reports
            .active_members(None)
            .await
            .map_err(|e| e.extend())?;

        Ok(entries.into_iter().map(|e| e.user).collect())
    }

    /// Catalog-wide availability summary
    async fn book_availability(&self, ctx: &Context<'_>) -> Result<AvailabilityReport> {
        require_user(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .reports
            .availability()
            .await
            .map_err(|e| e.extend())
    }

    /// The authenticated user
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let claims = require_user(ctx).map_err(|e| e.extend())?;

        services(ctx)
            .users
            .get_by_id(claims.user_id)
            .await
            .map_err(|e| e.extend())
    }
}
