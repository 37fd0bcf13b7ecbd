//! Page arithmetic shared by the list screens.

/// Items per page of the admin tables.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Items per page of the storefront catalog grid.
pub const CATALOG_ITEMS_PER_PAGE: usize = 12;

/// Number of pages needed for `total` items, never less than one.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

/// Offset of the first item of `page` (1-indexed).
pub fn skip(page: usize, per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(per_page)
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page buttons to render around `current_page`; `None` marks an ellipsis.
pub fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let current_page = current_page.max(1);
    get_pages(total_pages, current_page, 1, 1, 1, 1)
}
