//! Data models for Nalanda

pub mod book;
pub mod borrow;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use borrow::{Borrow, BorrowRecord};
pub use user::{Role, User};
