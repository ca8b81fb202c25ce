//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, publication_date, genre, copies)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_date)
        .bind(&book.genre)
        .bind(book.copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing book, keeping fields absent from the request
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                publication_date = COALESCE($5, publication_date),
                genre = COALESCE($6, genre),
                copies = COALESCE($7, copies)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_date)
        .bind(&book.genre)
        .bind(book.copies)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Search books with optional genre/author filters and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books
            WHERE ($1::text IS NULL OR genre = $1)
              AND ($2::text IS NULL OR author = $2)
            "#,
        )
        .bind(&query.genre)
        .bind(&query.author)
        .fetch_one(&self.pool)
        .await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR genre = $1)
              AND ($2::text IS NULL OR author = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.genre)
        .bind(&query.author)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }

    /// List books with optional filters, no pagination (GraphQL surface)
    pub async fn list_filtered(
        &self,
        genre: Option<&str>,
        author: Option<&str>,
    ) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE ($1::text IS NULL OR genre = $1)
              AND ($2::text IS NULL OR author = $2)
            ORDER BY id
            "#,
        )
        .bind(genre)
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
