//! Readers repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reader::{Reader, ReaderInput, ReaderPick},
};

#[derive(Clone)]
pub struct ReadersRepository {
    pool: Pool<Postgres>,
}

impl ReadersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reader by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE reader_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reader with id {} not found", id)))
    }

    /// List all readers ordered by name
    pub async fn list_all(&self) -> AppResult<Vec<Reader>> {
        let readers = sqlx::query_as::<_, Reader>("SELECT * FROM readers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(readers)
    }

    /// Short reader list for the borrow form
    pub async fn list_picks(&self) -> AppResult<Vec<ReaderPick>> {
        let readers = sqlx::query_as::<_, ReaderPick>(
            "SELECT reader_id, name, reader_number FROM readers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(readers)
    }

    /// Create a new reader
    pub async fn create(&self, reader: &ReaderInput) -> AppResult<Reader> {
        let now = Utc::now();

        sqlx::query_as::<_, Reader>(
            r#"
            INSERT INTO readers (name, reader_number, contact, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(&reader.name)
        .bind(&reader.reader_number)
        .bind(&reader.contact)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_db)
    }

    /// Update an existing reader
    pub async fn update(&self, id: i32, reader: &ReaderInput) -> AppResult<Reader> {
        let now = Utc::now();

        sqlx::query_as::<_, Reader>(
            r#"
            UPDATE readers SET name = $1, reader_number = $2, contact = $3, updated_at = $4
            WHERE reader_id = $5
            RETURNING *
            "#,
        )
        .bind(&reader.name)
        .bind(&reader.reader_number)
        .bind(&reader.contact)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_db)?
        .ok_or_else(|| AppError::NotFound(format!("Reader with id {} not found", id)))
    }

    /// Delete a reader. Refused while any open loan references them;
    /// closed loans are purged in the same transaction.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let open: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE reader_id = $1 AND return_date IS NULL)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open {
            return Err(AppError::BusinessRule(
                "Reader still has books that have not been returned".to_string(),
            ));
        }

        sqlx::query("DELETE FROM loans WHERE reader_id = $1 AND return_date IS NOT NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM readers WHERE reader_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_db)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Reader with id {} not found",
                id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Check if a reader number already exists
    pub async fn reader_number_exists(
        &self,
        reader_number: &str,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM readers WHERE reader_number = $1 AND reader_id != $2)",
            )
            .bind(reader_number)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE reader_number = $1)")
                .bind(reader_number)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }
}
