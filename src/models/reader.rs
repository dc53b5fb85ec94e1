//! Reader (patron) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Reader record from the registry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reader {
    pub reader_id: i32,
    pub name: String,
    /// Library card number, unique per reader
    pub reader_number: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating a reader
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReaderInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "reader number is required"))]
    pub reader_number: String,
    pub contact: Option<String>,
}

/// Short reader projection for the borrow form
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReaderPick {
    pub reader_id: i32,
    pub name: String,
    pub reader_number: String,
}
