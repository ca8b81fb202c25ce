//! Borrow (ledger) model and related types

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;

/// Borrow row from the ledger
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    /// Null while the borrow is outstanding; set exactly once on return
    pub return_date: Option<DateTime<Utc>>,
}

/// Borrow row joined with its book for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, SimpleObject)]
#[graphql(name = "Borrow")]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    /// Null when the referenced book has been deleted from the catalog
    pub book: Option<Book>,
}

impl From<Borrow> for BorrowRecord {
    fn from(borrow: Borrow) -> Self {
        BorrowRecord {
            id: borrow.id,
            user_id: borrow.user_id,
            book_id: borrow.book_id,
            borrow_date: borrow.borrow_date,
            return_date: borrow.return_date,
            book: None,
        }
    }
}
