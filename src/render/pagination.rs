//! Stateless windowing over a looping choice list.

/// Rows a select prompt shows at once.
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Indices of the items visible when `active` is focused.
///
/// When everything fits, all items are returned in order. Otherwise the window is `page_size`
/// items wide with `active` in its middle row, wrapping around the end of the list.
pub fn page_window(active: usize, total: usize, page_size: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let page_size = page_size.max(1);
    if total <= page_size {
        return (0..total).collect();
    }

    let active = active % total;
    let start = (active + total - page_size / 2) % total;
    (0..page_size).map(|offset| (start + offset) % total).collect()
}
