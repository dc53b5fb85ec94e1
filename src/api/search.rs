//! Loan history lookup endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{BookLoanEntry, ReaderLoanEntry},
};

/// Full loan history for one reader
#[utoipa::path(
    get,
    path = "/search/reader_loans/{id}",
    tag = "search",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader's loans, newest first", body = Vec<ReaderLoanEntry>),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn reader_loan_history(
    State(state): State<crate::AppState>,
    Path(reader_id): Path<i32>,
) -> AppResult<Json<Vec<ReaderLoanEntry>>> {
    let loans = state.services.loans.reader_history(reader_id).await?;
    Ok(Json(loans))
}

/// Full loan history for one book
#[utoipa::path(
    get,
    path = "/search/book_loans/{id}",
    tag = "search",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book's loans, newest first", body = Vec<BookLoanEntry>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_loan_history(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<BookLoanEntry>>> {
    let loans = state.services.loans.book_history(book_id).await?;
    Ok(Json(loans))
}
