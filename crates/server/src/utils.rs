//! Small helpers shared by the handler layer.

use axum::http::HeaderMap;
use error::response::PaginationMeta;

use crate::config::PaginationConfig;

/// Resolves the requested page and page size against configured bounds.
#[must_use]
pub fn clamp_pagination(page: Option<u64>, per_page: Option<u64>, config: &PaginationConfig) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(config.default_per_page).clamp(1, config.max_per_page);
    (page, per_page)
}

/// Slices one page out of an in-memory list.
#[must_use]
pub fn paginate_slice<T: Clone>(items: &[T], meta: &PaginationMeta) -> Vec<T> {
    let offset = meta.offset().unwrap_or(0) as usize;
    items
        .iter()
        .skip(offset)
        .take(meta.limit() as usize)
        .cloned()
        .collect()
}

/// Best-effort client address for view deduplication. Takes the first
/// `X-Forwarded-For` hop when present.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
