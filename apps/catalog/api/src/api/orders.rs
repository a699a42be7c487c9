//! Orders API routes

use axum::Router;
use domain_orders::{handlers, MongoOrderRepository, OrderService};
use domain_products::MongoProductRepository;
use std::sync::Arc;

use crate::state::AppState;

/// Create orders router
pub fn router(state: &AppState, products: Arc<MongoProductRepository>) -> Router {
    let repository = MongoOrderRepository::new(&state.db)
        .with_span(tracing::info_span!("orders_repository"));
    let service = OrderService::new(repository, products).with_span(tracing::info_span!("orders"));
    handlers::router(service)
}

/// Initialize orders indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoOrderRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
