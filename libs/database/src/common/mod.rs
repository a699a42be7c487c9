//! Store-independent building blocks shared by every backend.

pub mod error;
pub mod pagination;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use pagination::{InvalidSortDirection, Pagination, PaginationError, SortDirection};
pub use retry::{RetryConfig, retry, retry_with_backoff};
