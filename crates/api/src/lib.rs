//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for quotations, items, details and pricing configuration
//! - A validating JSON extractor
//! - Error mapping into the `{status, error, message}` envelope

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use obrix_core::quotation::QuotationReportService;
use obrix_db::QuotationRepository;
use obrix_shared::config::QuotationConfig;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Quotation reads and mutations.
    pub quotations: Arc<QuotationRepository>,
    /// Cost reports over the same repository.
    pub reports: Arc<QuotationReportService<QuotationRepository>>,
}

impl AppState {
    /// Builds the state from a connection pool and numbering settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, numbering: QuotationConfig) -> Self {
        let quotations = Arc::new(QuotationRepository::new(db.clone(), numbering));
        let reports = Arc::new(QuotationReportService::new(Arc::clone(&quotations)));

        Self {
            db: Arc::new(db),
            quotations,
            reports,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
