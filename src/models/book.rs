//! Book model and related types

use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, SimpleObject)]
#[graphql(name = "Book")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    /// Total owned copies, independent of how many are currently lent out
    pub copies: i32,
    pub created_at: DateTime<Utc>,
}

/// Create book request (also the GraphQL `BookInput`)
#[derive(Debug, Deserialize, Validate, ToSchema, InputObject)]
#[graphql(name = "BookInput")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    #[validate(range(min = 0, message = "Copies must not be negative"))]
    pub copies: i32,
}

/// Update book request (field-wise on REST; built from a full BookInput on GraphQL)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub genre: Option<String>,
    #[validate(range(min = 0, message = "Copies must not be negative"))]
    pub copies: Option<i32>,
}

impl From<CreateBook> for UpdateBook {
    fn from(input: CreateBook) -> Self {
        UpdateBook {
            title: Some(input.title),
            author: Some(input.author),
            isbn: Some(input.isbn),
            publication_date: Some(input.publication_date),
            genre: Some(input.genre),
            copies: Some(input.copies),
        }
    }
}

/// Book query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
