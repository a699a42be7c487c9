//! Orders Domain
//!
//! Orders reference a product and a customer. The order total is never
//! accepted from the client: the service resolves the product and stores
//! `price * quantity` on every create and update.
//!
//! Reporting queries run as MongoDB aggregation pipelines:
//!
//! - orders in a `createdAt` window, sorted and paginated
//! - monthly order counts and revenue
//! - a customer's orders, joined against the `users` collection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_orders::{handlers, MongoOrderRepository, OrderService};
//! use domain_products::MongoProductRepository;
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let orders = MongoOrderRepository::new(&db);
//! orders.init_indexes().await?;
//! let products = Arc::new(MongoProductRepository::new(&db));
//!
//! let service = OrderService::new(orders, products);
//! let router = axum::Router::new().nest("/orders", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryOrderRepository;
pub use models::{CreateOrder, DateRange, Order, OrderAggregate, UpdateOrder};
pub use mongodb::MongoOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
