//! Validation of caller-supplied paging arguments.

use crate::config::PageLimits;
use crate::repo::Page;
use crate::service::error::{ServiceError, ServiceResult};

/// Checks signed `offset`/`limit` query values and narrows them.
///
/// # Errors
/// - `InvalidPage` for negative values. A `limit` of 0 means the default.
pub fn page_args(offset: i64, limit: Option<i64>) -> ServiceResult<(u32, Option<u32>)> {
    if offset < 0 {
        return Err(ServiceError::InvalidPage(format!(
            "offset must be >= 0, got {offset}"
        )));
    }
    // Offsets past `u32::MAX` are beyond any stored collection; they page empty.
    let offset = u32::try_from(offset).unwrap_or(u32::MAX);
    let limit = match limit {
        Some(value) if value < 0 => {
            return Err(ServiceError::InvalidPage(format!(
                "limit must be >= 0, got {value}"
            )));
        }
        // Clamped by `PageLimits` afterwards.
        Some(value) => Some(u32::try_from(value).unwrap_or(u32::MAX)),
        None => None,
    };
    Ok((offset, limit))
}

pub(crate) fn window(limits: &PageLimits, offset: u32, limit: Option<u32>) -> Page {
    Page::new(offset, limits.normalize(limit))
}
