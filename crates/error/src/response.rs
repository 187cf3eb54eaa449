//! # API Response Types
//!
//! Generic API response types providing a consistent format for all
//! endpoints.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "status": "success",
//!   "data": { ... },
//!   "pagination": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total_items: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// Has next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,

    /// Has previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_prev: Option<bool>,
}

impl PaginationMeta {
    /// Maximum allowed page number to prevent integer overflow and excessive offsets
    const MAX_PAGE: u64 = 1_000_000;

    /// Create a new pagination meta with overflow protection.
    ///
    /// # Arguments
    ///
    /// * `page` - Page number (1-based)
    /// * `per_page` - Items per page
    /// * `total_items` - Total number of items
    ///
    /// Clamps `page` to `MAX_PAGE` if it exceeds the maximum allowed value.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = if page > Self::MAX_PAGE {
            tracing::warn!(
                "Page number {} exceeds maximum allowed value {}, clamping to max",
                page,
                Self::MAX_PAGE
            );
            Self::MAX_PAGE
        }
        else if page < 1 {
            1
        }
        else {
            page
        };

        let per_page = per_page.max(1);
        let total_pages = (total_items as f64 / per_page as f64).ceil() as u64;
        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: Some(page < total_pages),
            has_prev: Some(page > 1),
        }
    }

    /// Calculate offset for database queries with overflow protection.
    ///
    /// Returns `None` if the offset calculation would overflow.
    pub fn offset(&self) -> Option<u64> { self.page.checked_sub(1)?.checked_mul(self.per_page) }

    /// Calculate limit.
    pub fn limit(&self) -> u64 { self.per_page }
}

/// API response type.
///
/// The generic envelope used for all API responses: a `status` tag, the
/// payload under `data`, and pagination metadata for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        data: T,

        /// Pagination metadata for list responses.
        #[serde(skip_serializing_if = "Option::is_none")]
        pagination: Option<PaginationMeta>,
    },

    /// Error response.
    Error {
        /// Error code.
        code: String,

        /// Error message.
        message: String,
    },
}

impl<T> ApiResponse<T> {
    /// Creates a success response.
    #[inline]
    pub fn success(data: T) -> Self { Self::Success { data, pagination: None } }

    /// Creates a success response with pagination metadata.
    #[inline]
    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self::Success {
            data,
            pagination: Some(pagination),
        }
    }

    /// Creates an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        Self::Error {
            code:    code.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let response = ApiResponse::success(vec!["a", "b"]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"][0], "a");
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_paginated_serialization() {
        let response = ApiResponse::paginated(vec![1, 2, 3], PaginationMeta::new(2, 3, 10));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["totalPages"], 4);
        assert_eq!(json["pagination"]["hasPrev"], true);
    }

    #[test]
    fn test_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "missing");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[test]
    fn test_pagination_math() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.offset(), Some(20));
        assert_eq!(meta.limit(), 10);
        assert_eq!(meta.has_next, Some(false));
        assert_eq!(meta.has_prev, Some(true));
    }

    #[test]
    fn test_pagination_page_zero_defaults_to_one() {
        let meta = PaginationMeta::new(0, 10, 25);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.offset(), Some(0));
    }

    #[test]
    fn test_pagination_clamps_excessive_page() {
        let meta = PaginationMeta::new(u64::MAX, 10, 25);
        assert_eq!(meta.page, 1_000_000);
        assert!(meta.offset().is_some());
    }
}
