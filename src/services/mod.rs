//! Business logic services

pub mod catalog;
pub mod loans;
pub mod readers;
pub mod stats;

use crate::{config::PaginationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub readers: readers::ReadersService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, pagination: &PaginationConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(
                repository.clone(),
                pagination.per_page,
                pagination.max_per_page,
            ),
            readers: readers::ReadersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
