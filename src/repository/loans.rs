//! Loans repository for database operations.
//!
//! Borrow and return are the two write paths that touch stock. Both run
//! inside a single transaction that locks the relevant row with
//! SELECT ... FOR UPDATE first, so concurrent check-and-adjust sequences
//! are serialized by the store. Dropping the transaction on any error
//! path rolls everything back.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{BookLoanEntry, BorrowRequest, Loan, OpenLoan, ReaderLoanEntry},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE loan_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Borrow a book: lock the book row, check stock, insert the loan and
    /// decrement available_stock, all in one transaction.
    pub async fn borrow(&self, request: &BorrowRequest) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let stock: Option<i32> = sqlx::query_scalar(
            "SELECT available_stock FROM books WHERE book_id = $1 FOR UPDATE",
        )
        .bind(request.book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let stock = stock.ok_or_else(|| {
            AppError::NotFound(format!("Book with id {} not found", request.book_id))
        })?;

        if stock <= 0 {
            return Err(AppError::BusinessRule(
                "No copies of this book are available".to_string(),
            ));
        }

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, reader_id, loan_date, due_date)
            VALUES ($1, $2, CURRENT_DATE, $3)
            RETURNING *
            "#,
        )
        .bind(request.book_id)
        .bind(request.reader_id)
        .bind(request.due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from_db)?;

        sqlx::query(
            "UPDATE books SET available_stock = available_stock - 1, updated_at = NOW() WHERE book_id = $1",
        )
        .bind(request.book_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from_db)?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Return a loan: lock the open loan row, stamp the return date and
    /// increment the book's available_stock, all in one transaction.
    /// Finding no open row means the loan is unknown or already closed.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let book_id: Option<i32> = sqlx::query_scalar(
            "SELECT book_id FROM loans WHERE loan_id = $1 AND return_date IS NULL FOR UPDATE",
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book_id) = book_id else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE loan_id = $1)")
                    .bind(loan_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if exists {
                AppError::Conflict("Loan has already been returned".to_string())
            } else {
                AppError::NotFound(format!("Loan with id {} not found", loan_id))
            });
        };

        let loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET return_date = CURRENT_DATE WHERE loan_id = $1 RETURNING *",
        )
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE books SET available_stock = available_stock + 1, updated_at = NOW() WHERE book_id = $1",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from_db)?;

        tx.commit().await?;
        Ok(loan)
    }

    /// All loans with no return date, soonest due first
    pub async fn list_active(&self) -> AppResult<Vec<OpenLoan>> {
        let loans = sqlx::query_as::<_, OpenLoan>("SELECT * FROM active_loans ORDER BY due_date")
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Active loans whose due date has passed
    pub async fn list_overdue(&self) -> AppResult<Vec<OpenLoan>> {
        let loans = sqlx::query_as::<_, OpenLoan>("SELECT * FROM overdue_loans ORDER BY due_date")
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Full loan history for one reader, newest first
    pub async fn reader_history(&self, reader_id: i32) -> AppResult<Vec<ReaderLoanEntry>> {
        let loans = sqlx::query_as::<_, ReaderLoanEntry>(
            r#"
            SELECT l.loan_id, b.title AS book_title, b.isbn,
                   l.loan_date, l.due_date, l.return_date
            FROM loans l
            JOIN books b ON l.book_id = b.book_id
            WHERE l.reader_id = $1
            ORDER BY l.loan_date DESC, l.loan_id DESC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Full loan history for one book, newest first
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<BookLoanEntry>> {
        let loans = sqlx::query_as::<_, BookLoanEntry>(
            r#"
            SELECT l.loan_id, r.name AS reader_name, r.reader_number,
                   l.loan_date, l.due_date, l.return_date
            FROM loans l
            JOIN readers r ON l.reader_id = r.reader_id
            WHERE l.book_id = $1
            ORDER BY l.loan_date DESC, l.loan_id DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE return_date IS NULL AND due_date < CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count loans returned today
    pub async fn count_returned_today(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE return_date = CURRENT_DATE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
