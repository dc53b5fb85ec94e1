//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, readers, search, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "0.3.0",
        description = "Personal Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::get_book_for_edit,
        books::update_book,
        books::delete_book,
        // Readers
        readers::list_readers,
        readers::get_reader,
        readers::create_reader,
        readers::get_reader_for_edit,
        readers::update_reader,
        readers::delete_reader,
        // Loans
        loans::borrow_form,
        loans::borrow_book,
        loans::return_book,
        loans::list_active_loans,
        loans::list_overdue_loans,
        // Search
        search::reader_loan_history,
        search::book_loan_history,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookPick,
            // Readers
            crate::models::reader::Reader,
            crate::models::reader::ReaderInput,
            crate::models::reader::ReaderPick,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::BorrowRequest,
            crate::models::loan::OpenLoan,
            crate::models::loan::ReaderLoanEntry,
            crate::models::loan::BookLoanEntry,
            loans::BorrowFormResponse,
            loans::BorrowResponse,
            loans::ReturnResponse,
            // Stats
            stats::StatsResponse,
            stats::BookStats,
            stats::ReaderStats,
            stats::LoanStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "readers", description = "Reader registry management"),
        (name = "loans", description = "Lending workflow"),
        (name = "search", description = "Loan history lookups"),
        (name = "stats", description = "Library statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
