//! Lending service: borrow, return, history

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::borrow::{Borrow, BorrowRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the authenticated user
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Borrow> {
        let borrow = self.repository.borrows.borrow(user_id, book_id).await?;
        tracing::info!(user_id, book_id, borrow_id = borrow.id, "Book borrowed");
        Ok(borrow)
    }

    /// Return a borrowed book
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<DateTime<Utc>> {
        let returned = self.repository.borrows.return_book(user_id, book_id).await?;
        tracing::info!(user_id, book_id, "Book returned");
        Ok(returned)
    }

    /// Full borrowing history for a user
    pub async fn history(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrows.history(user_id).await
    }
}
