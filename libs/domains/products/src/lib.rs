//! Products Domain
//!
//! The product catalog: CRUD, name and price searches, and the top-selling
//! ranking computed from the orders collection.
//!
//! Requests flow `handlers` → [`ProductService`] → [`ProductRepository`].
//! Two repositories implement the trait: [`MongoProductRepository`] for the
//! running service and [`InMemoryProductRepository`] for handler tests.
//! Prices are [`rust_decimal::Decimal`] in memory and doubles on the wire.
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = axum::Router::new()
//!     .nest("/products", handlers::router(ProductService::new(repository)));
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

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{CreateProduct, Product, ProductSales, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
