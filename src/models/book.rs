//! Book (catalog) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    /// Total copies owned
    pub total_stock: i32,
    /// Copies not currently lent out
    pub available_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a book. Available stock starts equal to the
/// total stock.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "total stock cannot be negative"))]
    pub total_stock: i32,
}

/// Payload for updating a book. Both stock figures are set explicitly;
/// the service rejects available_stock outside 0..=total_stock before
/// touching the store.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    #[validate(range(min = 0, message = "total stock cannot be negative"))]
    pub total_stock: i32,
    #[validate(range(min = 0, message = "available stock cannot be negative"))]
    pub available_stock: i32,
}

/// Query parameters for the book listing
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring match on title or author, or exact ISBN match
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Short book projection for the borrow form (only books in stock)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookPick {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub available_stock: i32,
}
