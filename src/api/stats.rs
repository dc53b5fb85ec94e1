//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Catalog statistics
    pub books: BookStats,
    /// Reader statistics
    pub readers: ReaderStats,
    /// Loan statistics
    pub loans: LoanStats,
}

#[derive(Serialize, ToSchema)]
pub struct BookStats {
    /// Number of distinct titles
    pub total: i64,
    /// Total copies owned
    pub copies_total: i64,
    /// Copies currently on the shelf
    pub copies_available: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ReaderStats {
    /// Number of registered readers
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct LoanStats {
    /// Active loans
    pub active: i64,
    /// Overdue loans
    pub overdue: i64,
    /// Books returned today
    pub returned_today: i64,
}

/// Library-wide statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Aggregate counts", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.collect().await?;

    Ok(Json(StatsResponse {
        books: BookStats {
            total: stats.books_total,
            copies_total: stats.copies_total,
            copies_available: stats.copies_available,
        },
        readers: ReaderStats {
            total: stats.readers_total,
        },
        loans: LoanStats {
            active: stats.loans_active,
            overdue: stats.loans_overdue,
            returned_today: stats.returned_today,
        },
    }))
}
