//! Paging query parameters.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use database::common::{Pagination, SortDirection};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    page: Option<String>,
    page_size: Option<String>,
    limit: Option<String>,
}

/// Reads `page` and `page_size` (alias `limit`) from the query string.
///
/// Missing values fall back to page 1 and size 10. Anything that is not a
/// positive integer is rejected with 400. Unrelated query parameters are
/// ignored, so this composes with a handler's own `Query<T>`.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery(pub Pagination);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPage>::try_from_uri(&parts.uri)?;

        let page = positive("page", raw.page.as_deref(), Pagination::DEFAULT_PAGE)?;
        let size_raw = raw.page_size.as_deref().or(raw.limit.as_deref());
        let page_size = positive("page_size", size_raw, Pagination::DEFAULT_PAGE_SIZE)?;

        Pagination::new(page, page_size)
            .map(PageQuery)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

fn positive(name: &str, raw: Option<&str>, default: u64) -> Result<u64, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AppError::BadRequest(format!(
                "{name} must be a positive integer, got '{value}'"
            ))),
        },
    }
}

/// Parses the signed `order` flag, defaulting to ascending when absent.
pub fn parse_sort_direction(raw: Option<&str>) -> Result<SortDirection, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(SortDirection::default()),
        Some(value) => value
            .parse()
            .map_err(|e: database::common::InvalidSortDirection| AppError::BadRequest(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<Pagination, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        PageQuery::from_request_parts(&mut parts, &()).await.map(|p| p.0)
    }

    #[tokio::test]
    async fn test_defaults() {
        let page = extract("/orders").await.unwrap();
        assert_eq!((page.page(), page.page_size()), (1, 10));
    }

    #[tokio::test]
    async fn test_page_size_and_limit_alias() {
        let page = extract("/orders?page=3&page_size=5").await.unwrap();
        assert_eq!((page.page(), page.page_size(), page.skip()), (3, 5, 10));

        let page = extract("/products?page=2&limit=20&name=x").await.unwrap();
        assert_eq!((page.page(), page.page_size()), (2, 20));

        let page = extract("/products?limit=20&page_size=4").await.unwrap();
        assert_eq!(page.page_size(), 4);
    }

    #[tokio::test]
    async fn test_rejects_non_positive() {
        for uri in [
            "/orders?page=0",
            "/orders?page=-1",
            "/orders?page=abc",
            "/orders?page_size=0",
            "/orders?limit=1.5",
        ] {
            let err = extract(uri).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{uri} should be rejected");
        }
    }

    #[test]
    fn test_parse_sort_direction() {
        assert_eq!(parse_sort_direction(None).unwrap(), SortDirection::Ascending);
        assert_eq!(parse_sort_direction(Some("-1")).unwrap(), SortDirection::Descending);
        assert!(matches!(
            parse_sort_direction(Some("0")),
            Err(AppError::BadRequest(msg)) if msg.contains("-1 or 1")
        ));
    }
}
