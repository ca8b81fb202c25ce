//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Delete confirmation
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

/// List books with optional filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("genre" = Option<String>, Query, description = "Filter by genre"),
        ("author" = Option<String>, Query, description = "Filter by author"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let (books, total) = state.services.catalog.search_books(&query).await?;

    Ok(Json(PaginatedResponse {
        items: books,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(10),
    }))
}

/// Add a new book (admin only)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_admin()?;

    let created = state.services.catalog.add_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book (admin only)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_admin()?;

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Delete a book (admin only)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = DeleteResponse),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteResponse>> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(Json(DeleteResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
