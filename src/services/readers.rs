//! Reader registry service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::reader::{Reader, ReaderInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadersService {
    repository: Repository,
}

impl ReadersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all readers
    pub async fn list_readers(&self) -> AppResult<Vec<Reader>> {
        self.repository.readers.list_all().await
    }

    /// Get reader by ID
    pub async fn get_reader(&self, id: i32) -> AppResult<Reader> {
        self.repository.readers.get_by_id(id).await
    }

    /// Create a new reader
    pub async fn create_reader(&self, reader: ReaderInput) -> AppResult<Reader> {
        reader
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // The unique index catches concurrent creates that race this check
        if self
            .repository
            .readers
            .reader_number_exists(&reader.reader_number, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Reader number {} is already taken",
                reader.reader_number
            )));
        }

        self.repository.readers.create(&reader).await
    }

    /// Update an existing reader
    pub async fn update_reader(&self, id: i32, reader: ReaderInput) -> AppResult<Reader> {
        reader
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .repository
            .readers
            .reader_number_exists(&reader.reader_number, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Reader number {} is already used by another reader",
                reader.reader_number
            )));
        }

        self.repository.readers.update(id, &reader).await
    }

    /// Delete a reader (refused while they have open loans)
    pub async fn delete_reader(&self, id: i32) -> AppResult<()> {
        self.repository.readers.delete(id).await
    }
}
