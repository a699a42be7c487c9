//! Store-agnostic paging and ordering primitives.
//!
//! Both types are validated on construction, so repositories can trust them
//! without re-checking bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rejected paging input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u64,
    page_size: u64,
}

impl Pagination {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_PAGE_SIZE: u64 = 10;

    pub fn new(page: u64, page_size: u64) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::NotPositive("page"));
        }
        if page_size == 0 {
            return Err(PaginationError::NotPositive("page_size"));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of records to skip: `(page - 1) * page_size`, capped at
    /// `i64::MAX` since stores encode the offset as a signed 64-bit integer.
    pub fn skip(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }

    /// Page size as the signed limit MongoDB expects.
    pub fn limit(&self) -> i64 {
        i64::try_from(self.page_size).unwrap_or(i64::MAX)
    }

    /// Applies this page to an already ordered slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.skip()).unwrap_or(usize::MAX).min(items.len());
        let len = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(items.len());
        &items[start..end]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Sort flag outside {-1, 1}.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("order must be -1 or 1, got {0}")]
pub struct InvalidSortDirection(pub String);

/// Signed sort flag: `1` ascending, `-1` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

impl TryFrom<i32> for SortDirection {
    type Error = InvalidSortDirection;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(InvalidSortDirection(other.to_string())),
        }
    }
}

impl From<SortDirection> for i32 {
    fn from(direction: SortDirection) -> Self {
        direction.as_i32()
    }
}

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i32 = s
            .trim()
            .parse()
            .map_err(|_| InvalidSortDirection(s.to_string()))?;
        SortDirection::try_from(value)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
