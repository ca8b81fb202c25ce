//! Borrows repository: the lending ledger and its transactional core

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrow::{Borrow, BorrowRecord},
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book: decrement the copy count and append a ledger row,
    /// both inside one transaction. The conditional `copies >= 1` update is
    /// what keeps concurrent borrowers from driving the count negative.
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE books SET copies = copies - 1 WHERE id = $1 AND copies >= 1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;

            return Err(if exists {
                AppError::Validation("No copies available".to_string())
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (user_id, book_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error().and_then(|db| db.constraint()) {
            Some("borrows_one_outstanding_per_user_book") => {
                AppError::Validation("Book already borrowed and not yet returned".to_string())
            }
            _ => AppError::Database(e),
        })?;

        tx.commit().await?;

        Ok(borrow)
    }

    /// Return a book: close the most recent outstanding ledger row for the
    /// (user, book) pair and restore the copy count. A book deleted from the
    /// catalog in the meantime is tolerated silently.
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<DateTime<Utc>> {
        let mut tx = self.pool.begin().await?;

        let returned: Option<(i32, DateTime<Utc>)> = sqlx::query_as(
            r#"
            UPDATE borrows SET return_date = now()
            WHERE id = (
                SELECT id FROM borrows
                WHERE user_id = $1 AND book_id = $2 AND return_date IS NULL
                ORDER BY borrow_date DESC, id DESC
                LIMIT 1
            )
            RETURNING id, return_date
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((_, return_date)) = returned else {
            return Err(AppError::NotFound(
                "No active borrow record found for this book".to_string(),
            ));
        };

        sqlx::query("UPDATE books SET copies = copies + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(return_date)
    }

    /// Full borrowing history for a user, each row joined with its book
    pub async fn history(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT br.id, br.user_id, br.book_id, br.borrow_date, br.return_date,
                   b.id AS joined_book_id, b.title, b.author, b.isbn,
                   b.publication_date, b.genre, b.copies, b.created_at
            FROM borrows br
            LEFT JOIN books b ON b.id = br.book_id
            WHERE br.user_id = $1
            ORDER BY br.borrow_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let book = row
                .get::<Option<i32>, _>("joined_book_id")
                .map(|id| Book {
                    id,
                    title: row.get("title"),
                    author: row.get("author"),
                    isbn: row.get("isbn"),
                    publication_date: row.get("publication_date"),
                    genre: row.get("genre"),
                    copies: row.get("copies"),
                    created_at: row.get("created_at"),
                });

            records.push(BorrowRecord {
                id: row.get("id"),
                user_id: row.get("user_id"),
                book_id: row.get("book_id"),
                borrow_date: row.get("borrow_date"),
                return_date: row.get("return_date"),
                book,
            });
        }

        Ok(records)
    }
}
