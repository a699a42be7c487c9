use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::InvalidObjectId;
use domain_products::ProductError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(String),

    /// Order or customer identifier is not a valid store id.
    #[error("Invalid order id: {0}")]
    InvalidId(String),

    /// The customer join produced no rows.
    #[error("No orders found for customer {0}")]
    NoCustomerOrders(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Resolving the referenced product failed; the order was not written.
    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::InvalidId(id) => {
                AppError::InvalidIdentifier(format!("Invalid identifier '{}'", id))
            }
            OrderError::NoCustomerOrders(id) => {
                AppError::NotFound(format!("No orders found for customer {}", id))
            }
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Product(err) => err.into(),
            OrderError::Database(msg) => AppError::InternalServerError(msg),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for OrderError {
    fn from(err: mongodb::error::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<InvalidObjectId> for OrderError {
    fn from(err: InvalidObjectId) -> Self {
        OrderError::InvalidId(err.0)
    }
}
