//! API routes module

pub mod health;
pub mod orders;
pub mod products;

use axum::Router;
use domain_products::MongoProductRepository;
use std::sync::Arc;

use crate::state::AppState;

/// Create all API routes.
///
/// Orders price against the same product repository the products routes use.
pub fn routes(state: &AppState) -> Router {
    let product_repository = Arc::new(products::repository(state));

    Router::new()
        .nest("/products", products::router(Arc::clone(&product_repository)))
        .nest("/orders", orders::router(state, product_repository))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoProductRepository::new(&state.db).init_indexes().await?;
    orders::init_indexes(state).await
}
