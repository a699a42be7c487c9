use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::InvalidObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(String),

    /// Identifier is not a valid store id.
    #[error("Invalid product id: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidId(id) => {
                AppError::InvalidIdentifier(format!("Invalid product id '{}'", id))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<InvalidObjectId> for ProductError {
    fn from(err: InvalidObjectId) -> Self {
        ProductError::InvalidId(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::NotFound("abc".into()), StatusCode::NOT_FOUND),
            (ProductError::InvalidId("abc".into()), StatusCode::BAD_REQUEST),
            (ProductError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ProductError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ProductError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_invalid_object_id_maps_to_invalid_id() {
        let err: ProductError = InvalidObjectId("xyz".into()).into();
        assert!(matches!(err, ProductError::InvalidId(id) if id == "xyz"));
    }
}
