//! Lending workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::BookPick,
        loan::{BorrowRequest, Loan, OpenLoan},
        reader::ReaderPick,
    },
};

/// Data backing the borrow form
#[derive(Serialize, ToSchema)]
pub struct BorrowFormResponse {
    /// Books with at least one available copy
    pub books: Vec<BookPick>,
    /// All registered readers
    pub readers: Vec<ReaderPick>,
}

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// The newly created loan
    pub loan: Loan,
    /// Status message
    pub message: String,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// The closed loan
    pub loan: Loan,
}

/// Fetch the data needed to fill in a borrow form
#[utoipa::path(
    get,
    path = "/loans/borrow",
    tag = "loans",
    responses(
        (status = 200, description = "Borrowable books and registered readers", body = BorrowFormResponse)
    )
)]
pub async fn borrow_form(
    State(state): State<crate::AppState>,
) -> AppResult<Json<BorrowFormResponse>> {
    let (books, readers) = state.services.loans.borrow_form_data().await?;
    Ok(Json(BorrowFormResponse { books, readers }))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/loans/borrow",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan created", body = BorrowResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Book or reader not found"),
        (status = 422, description = "No copies available")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let loan = state.services.loans.borrow(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            loan,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_loan(loan_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan,
    }))
}

/// List all active loans
#[utoipa::path(
    get,
    path = "/loans/active",
    tag = "loans",
    responses(
        (status = 200, description = "Open loans, soonest due first", body = Vec<OpenLoan>)
    )
)]
pub async fn list_active_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<OpenLoan>>> {
    let loans = state.services.loans.list_active().await?;
    Ok(Json(loans))
}

/// List all overdue loans
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    responses(
        (status = 200, description = "Open loans past their due date", body = Vec<OpenLoan>)
    )
)]
pub async fn list_overdue_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<OpenLoan>>> {
    let loans = state.services.loans.list_overdue().await?;
    Ok(Json(loans))
}
