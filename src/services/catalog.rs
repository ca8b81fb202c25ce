//! Catalog service: book CRUD

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the catalog
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.update(id, &book).await
    }

    /// Remove a book from the catalog
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// Search books with filters and pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// List books with optional filters, no pagination
    pub async fn list_books(
        &self,
        genre: Option<&str>,
        author: Option<&str>,
    ) -> AppResult<Vec<Book>> {
        self.repository.books.list_filtered(genre, author).await
    }
}
