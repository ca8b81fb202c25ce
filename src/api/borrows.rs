//! Lending endpoints: borrow, return, history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{Borrow, BorrowRecord},
};

use super::AuthenticatedUser;

/// Borrow response with the created ledger row
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Status message
    pub message: String,
    /// The created borrow record
    pub borrow: Borrow,
}

/// Return confirmation
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows/{book_id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "No copies available or already borrowed"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrow = state.services.lending.borrow(claims.user_id, book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: "Book borrowed successfully".to_string(),
            borrow,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{book_id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "No active borrow record for this book")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    state
        .services
        .lending
        .return_book(claims.user_id, book_id)
        .await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
    }))
}

/// Get the authenticated user's full borrowing history
#[utoipa::path(
    get,
    path = "/borrows/history",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowing history", body = Vec<BorrowRecord>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.lending.history(claims.user_id).await?;
    Ok(Json(records))
}
