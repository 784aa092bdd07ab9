//! Page arithmetic for listings.

use core::ops::Range;

use serde::{Deserialize, Serialize};

/// Where a requested page lands in a listing of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// 1-indexed page actually served (after clamping).
    pub page: usize,
    /// Always at least 1, even for an empty listing.
    pub total_pages: usize,
    /// Offset of the first item on the page (0-based).
    pub offset: usize,
    /// Number of items on the page.
    pub len: usize,
}

impl PageWindow {
    /// Locate `requested_page` in a listing of `total_count` items.
    ///
    /// `page_size` must be non-zero (validated by the caller). The requested
    /// page is clamped into `[1, total_pages]`.
    pub fn locate(total_count: usize, requested_page: i64, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);

        let page = usize::try_from(requested_page)
            .unwrap_or(1)
            .clamp(1, total_pages);

        let offset = (page - 1).saturating_mul(page_size).min(total_count);
        let len = page_size.min(total_count - offset);

        Self {
            page,
            total_pages,
            offset,
            len,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
