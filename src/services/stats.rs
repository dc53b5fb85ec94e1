//! Library statistics service

use sqlx::Row;

use crate::{error::AppResult, repository::Repository};

/// Aggregate counts over the catalog, the registry and the loan ledger
#[derive(Debug, Clone)]
pub struct LibraryStats {
    pub books_total: i64,
    pub copies_total: i64,
    pub copies_available: i64,
    pub readers_total: i64,
    pub loans_active: i64,
    pub loans_overdue: i64,
    pub returned_today: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Cheap connectivity probe backing the readiness endpoint
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.repository.pool)
            .await?;
        Ok(())
    }

    /// Collect the aggregate counts
    pub async fn collect(&self) -> AppResult<LibraryStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS books_total,
                   COALESCE(SUM(total_stock), 0)::bigint AS copies_total,
                   COALESCE(SUM(available_stock), 0)::bigint AS copies_available
            FROM books
            "#,
        )
        .fetch_one(&self.repository.pool)
        .await?;

        let books_total: i64 = row.get("books_total");
        let copies_total: i64 = row.get("copies_total");
        let copies_available: i64 = row.get("copies_available");

        let readers_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM readers")
            .fetch_one(&self.repository.pool)
            .await?;

        Ok(LibraryStats {
            books_total,
            copies_total,
            copies_available,
            readers_total,
            loans_active: self.repository.loans.count_active().await?,
            loans_overdue: self.repository.loans.count_overdue().await?,
            returned_today: self.repository.loans.count_returned_today().await?,
        })
    }
}
