//! Loan (lending) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan record from the database. A null return_date means the book is
/// still out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub loan_id: i32,
    pub book_id: i32,
    pub reader_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// Borrow request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub book_id: i32,
    pub reader_id: i32,
    pub due_date: NaiveDate,
}

/// Row of the active_loans / overdue_loans views: an open loan joined
/// with its book and reader.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OpenLoan {
    pub loan_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub isbn: String,
    pub reader_id: i32,
    pub reader_name: String,
    pub reader_number: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// One entry of a reader's loan history (open and closed loans alike)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReaderLoanEntry {
    pub loan_id: i32,
    pub book_title: String,
    pub isbn: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

/// One entry of a book's loan history
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookLoanEntry {
    pub loan_id: i32,
    pub reader_name: String,
    pub reader_number: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}
