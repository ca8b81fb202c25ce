//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nalanda API",
        version = "1.0.0",
        description = "Library Management System REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrows
        borrows::borrow_book,
        borrows::return_book,
        borrows::history,
        // Reports
        reports::most_borrowed,
        reports::active_members,
        reports::availability,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::DeleteResponse,
            // Borrows
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowRecord,
            borrows::BorrowResponse,
            borrows::ReturnResponse,
            // Reports
            crate::services::reports::MostBorrowedEntry,
            crate::services::reports::ActiveMemberEntry,
            crate::services::reports::AvailabilityReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "borrows", description = "Borrow and return operations"),
        (name = "reports", description = "Reporting and aggregations")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
