//! Request extractors that turn malformed input into [`AppError`](crate::AppError)
//! responses before a handler body runs.

pub mod page_query;
pub mod validated_json;

pub use page_query::{PageQuery, parse_sort_direction};
pub use validated_json::ValidatedJson;
