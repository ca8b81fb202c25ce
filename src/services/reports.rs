//! Reporting engine: aggregations over the lending ledger and catalog

use std::collections::HashMap;

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::Book, user::User},
    repository::Repository,
};

pub const DEFAULT_REPORT_LIMIT: i64 = 5;

/// A book with its all-time borrow count
#[derive(Debug, Serialize, ToSchema)]
pub struct MostBorrowedEntry {
    pub book: Book,
    pub borrow_count: i64,
}

/// A member with their all-time borrow count
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveMemberEntry {
    pub user: User,
    pub borrow_count: i64,
}

/// Catalog-wide availability summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, SimpleObject)]
#[graphql(name = "AvailabilityReport")]
pub struct AvailabilityReport {
    /// Distinct titles in the catalog
    pub total_unique_books: i64,
    /// Distinct titles with at least one outstanding borrow
    pub borrowed_unique_books: i64,
    /// Distinct titles with at least one available copy
    pub available_unique_books: i64,
    /// Sum of owned copies across the catalog
    pub total_books: i64,
    /// Sum of outstanding borrows
    pub borrowed_books: i64,
    /// Sum of available copies
    pub available_books: i64,
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Most borrowed books over the entire ledger history.
    /// Ties are broken by book id so results are deterministic.
    pub async fn most_borrowed(&self, limit: Option<i64>) -> AppResult<Vec<MostBorrowedEntry>> {
        let limit = limit.unwrap_or(DEFAULT_REPORT_LIMIT).clamp(1, 100);

        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author, b.isbn, b.publication_date,
                   b.genre, b.copies, b.created_at, t.borrow_count
            FROM books b
            JOIN (
                SELECT book_id, COUNT(*) AS borrow_count
                FROM borrows
                GROUP BY book_id
            ) t ON t.book_id = b.id
            ORDER BY t.borrow_count DESC, b.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MostBorrowedEntry {
                book: Book {
                    id: row.get("id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    isbn: row.get("isbn"),
                    publication_date: row.get("publication_date"),
                    genre: row.get("genre"),
                    copies: row.get("copies"),
                    created_at: row.get("created_at"),
                },
                borrow_count: row.get("borrow_count"),
            })
            .collect())
    }

    /// Members ranked by all-time borrow count (not currently-outstanding
    /// borrows, despite the endpoint name inherited from the API surface).
    pub async fn active_members(&self, limit: Option<i64>) -> AppResult<Vec<ActiveMemberEntry>> {
        let limit = limit.unwrap_or(DEFAULT_REPORT_LIMIT).clamp(1, 100);

        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.password, u.role, u.created_at,
                   t.borrow_count
            FROM users u
            JOIN (
                SELECT user_id, COUNT(*) AS borrow_count
                FROM borrows
                GROUP BY user_id
            ) t ON t.user_id = u.id
            ORDER BY t.borrow_count DESC, u.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActiveMemberEntry {
                user: User {
                    id: row.get("id"),
                    name: row.get("name"),
                    email: row.get("email"),
                    password: row.get("password"),
                    role: row.get("role"),
                    created_at: row.get("created_at"),
                },
                borrow_count: row.get("borrow_count"),
            })
            .collect())
    }

    /// Catalog-wide availability: outstanding counts are aggregated once and
    /// looked up per book in memory.
    pub async fn availability(&self) -> AppResult<AvailabilityReport> {
        let stock: Vec<(i32, i32)> = sqlx::query_as("SELECT id, copies FROM books")
            .fetch_all(&self.repository.pool)
            .await?;

        let outstanding: Vec<(i32, i64)> = sqlx::query_as(
            r#"
            SELECT book_id, COUNT(*)
            FROM borrows
            WHERE return_date IS NULL
            GROUP BY book_id
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;

        let outstanding: HashMap<i32, i64> = outstanding.into_iter().collect();

        Ok(summarize_availability(&stock, &outstanding))
    }
}

/// Fold per-book stock and outstanding-borrow counts into the six report
/// totals. `borrowed_books + available_books == total_books` holds for any
/// input where no book is over-borrowed.
fn summarize_availability(
    stock: &[(i32, i32)],
    outstanding: &HashMap<i32, i64>,
) -> AvailabilityReport {
    let mut report = AvailabilityReport {
        total_unique_books: stock.len() as i64,
        borrowed_unique_books: 0,
        available_unique_books: 0,
        total_books: 0,
        borrowed_books: 0,
        available_books: 0,
    };

    for (book_id, copies) in stock {
        let borrowed = outstanding.get(book_id).copied().unwrap_or(0);
        let available = *copies as i64 - borrowed;

        report.total_books += *copies as i64;
        report.borrowed_books += borrowed;
        report.available_books += available;

        if borrowed > 0 {
            report.borrowed_unique_books += 1;
        }
        if available > 0 {
            report.available_unique_books += 1;
        }
    }

    report
}
