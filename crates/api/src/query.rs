//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Effective limit: defaulted, capped at [`MAX_LIMIT`], never negative.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset: defaulted to 0, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
