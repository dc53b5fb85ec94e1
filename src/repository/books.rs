//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPick, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books with pagination. The search term matches title or
    /// author as a case-insensitive substring, or the ISBN exactly.
    pub async fn search(
        &self,
        query: &BookQuery,
        default_per_page: i64,
        max_per_page: i64,
    ) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, max_per_page);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(format!("%{}%", search));
            let like = params.len();
            params.push(search.to_string());
            conditions.push(format!(
                "(title ILIKE ${like} OR author ILIKE ${like} OR isbn = ${exact})",
                like = like,
                exact = params.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM books {} ORDER BY title LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Books with at least one available copy, for the borrow form
    pub async fn list_in_stock(&self) -> AppResult<Vec<BookPick>> {
        let books = sqlx::query_as::<_, BookPick>(
            r#"
            SELECT book_id, title, author, available_stock
            FROM books
            WHERE available_stock > 0
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a new book. Available stock starts equal to total stock.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, author, isbn, publisher, publication_year, category,
                total_stock, available_stock, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.category)
        .bind(book.total_stock)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_db)
    }

    /// Update an existing book, stock figures included
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let now = Utc::now();

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $1, author = $2, isbn = $3, publisher = $4,
                publication_year = $5, category = $6,
                total_stock = $7, available_stock = $8, updated_at = $9
            WHERE book_id = $10
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.category)
        .bind(book.total_stock)
        .bind(book.available_stock)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_db)?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book. Refused while any open loan references it; closed
    /// loans are purged in the same transaction so the foreign key does
    /// not block the delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let open: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND return_date IS NULL)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open {
            return Err(AppError::BusinessRule(
                "Book has loans that have not been returned yet".to_string(),
            ));
        }

        sqlx::query("DELETE FROM loans WHERE book_id = $1 AND return_date IS NOT NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_db)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Check if ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND book_id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }
}
