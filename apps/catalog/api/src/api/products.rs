//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductService};
use std::sync::Arc;

use crate::state::AppState;

pub fn repository(state: &AppState) -> MongoProductRepository {
    MongoProductRepository::new(&state.db)
        .with_span(tracing::info_span!("products_repository"))
}

/// Create products router
pub fn router(repository: Arc<MongoProductRepository>) -> Router {
    let service =
        ProductService::from_shared(repository).with_span(tracing::info_span!("products"));
    handlers::router(service)
}
