//! Balanced, order-preserving distribution of an ordered collection across display screens.
//!
//! The first `len % screen_count` screens get one item more than the rest, so any two screens
//! differ by at most one item and concatenating all screens in order yields the input.

use core::ops::Range;

/// Index range of the items shown on `screen_index` (1-based) out of `screen_count` screens.
///
/// If there is only one screen, or `screen_index` is outside `1..=screen_count`, the whole
/// range `0..len` is returned.
#[must_use]
pub fn screen_bounds(len: usize, screen_count: usize, screen_index: usize) -> Range<usize> {
    if screen_count <= 1 || screen_index == 0 || screen_index > screen_count {
        return 0..len;
    }
    let base = len / screen_count;
    let extra = len % screen_count;
    let preceding = screen_index - 1;
    let start = preceding * base + preceding.min(extra);
    let size = if screen_index <= extra { base + 1 } else { base };
    start..start + size
}

/// The contiguous slice of `items` that `screen_index` (1-based) shows out of `screen_count`.
///
/// See [`screen_bounds`] for the degenerate cases, which return `items` unmodified.
#[must_use]
pub fn assign<T>(items: &[T], screen_count: usize, screen_index: usize) -> &[T] {
    items
        .get(screen_bounds(items.len(), screen_count, screen_index))
        .unwrap_or(items)
}
