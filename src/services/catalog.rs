//! Catalog (books) management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    default_per_page: i64,
    max_per_page: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, default_per_page: i64, max_per_page: i64) -> Self {
        Self {
            repository,
            default_per_page,
            max_per_page,
        }
    }

    /// Search books with pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository
            .books
            .search(query, self.default_per_page, self.max_per_page)
            .await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // The unique index catches concurrent creates that race this check
        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn
            )));
        }

        self.repository.books.create(&book).await
    }

    /// Update an existing book. The stock bounds are checked here before
    /// any write; the chk_available_stock constraint backstops them.
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if book.available_stock > book.total_stock {
            return Err(AppError::Validation(
                "Available stock cannot exceed total stock".to_string(),
            ));
        }

        if self
            .repository
            .books
            .isbn_exists(&book.isbn, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "ISBN {} is already used by another book",
                book.isbn
            )));
        }

        self.repository.books.update(id, &book).await
    }

    /// Delete a book (refused while it has open loans)
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
