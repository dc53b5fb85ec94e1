//! Lending workflow service

use crate::{
    error::AppResult,
    models::{
        book::BookPick,
        loan::{BookLoanEntry, BorrowRequest, Loan, OpenLoan, ReaderLoanEntry},
        reader::ReaderPick,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Data backing the borrow form: books in stock plus all readers
    pub async fn borrow_form_data(&self) -> AppResult<(Vec<BookPick>, Vec<ReaderPick>)> {
        let books = self.repository.books.list_in_stock().await?;
        let readers = self.repository.readers.list_picks().await?;
        Ok((books, readers))
    }

    /// Borrow a book. The reader is verified up front; the book lookup,
    /// stock check and decrement happen inside the locked transaction.
    pub async fn borrow(&self, request: BorrowRequest) -> AppResult<Loan> {
        self.repository.readers.get_by_id(request.reader_id).await?;
        self.repository.loans.borrow(&request).await
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.return_loan(loan_id).await
    }

    /// All open loans
    pub async fn list_active(&self) -> AppResult<Vec<OpenLoan>> {
        self.repository.loans.list_active().await
    }

    /// Open loans past their due date
    pub async fn list_overdue(&self) -> AppResult<Vec<OpenLoan>> {
        self.repository.loans.list_overdue().await
    }

    /// Loan history for a reader (verifies the reader exists)
    pub async fn reader_history(&self, reader_id: i32) -> AppResult<Vec<ReaderLoanEntry>> {
        self.repository.readers.get_by_id(reader_id).await?;
        self.repository.loans.reader_history(reader_id).await
    }

    /// Loan history for a book (verifies the book exists)
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<BookLoanEntry>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.loans.book_history(book_id).await
    }
}
