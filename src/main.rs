//! Athenaeum Server - Personal Library Management System
//!
//! A Rust web server for managing a small library: books, readers and
//! the loans that connect them.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athenaeum_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "athenaeum_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Athenaeum Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config.pagination);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books/new", post(api::books::create_book))
        .route(
            "/books/edit/:id",
            get(api::books::get_book_for_edit).post(api::books::update_book),
        )
        .route("/books/delete/:id", post(api::books::delete_book))
        .route("/books/:id", get(api::books::get_book))
        // Readers
        .route("/readers", get(api::readers::list_readers))
        .route("/readers/new", post(api::readers::create_reader))
        .route(
            "/readers/edit/:id",
            get(api::readers::get_reader_for_edit).post(api::readers::update_reader),
        )
        .route("/readers/delete/:id", post(api::readers::delete_reader))
        .route("/readers/:id", get(api::readers::get_reader))
        // Loans
        .route(
            "/loans/borrow",
            get(api::loans::borrow_form).post(api::loans::borrow_book),
        )
        .route("/loans/return/:id", post(api::loans::return_book))
        .route("/loans/active", get(api::loans::list_active_loans))
        .route("/loans/overdue", get(api::loans::list_overdue_loans))
        // Loan history
        .route(
            "/search/reader_loans/:id",
            get(api::search::reader_loan_history),
        )
        .route("/search/book_loans/:id", get(api::search::book_loan_history))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    routes
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
