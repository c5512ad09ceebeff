//! Visible-slice calculation for long lists.
//!
//! [`compute_window`] decides which contiguous part of a list fits in the
//! viewport while keeping the selection visible and roughly centered.

use std::ops::Range;

/// The visible part of a list.
///
/// `start` and `end` are inclusive indices into the full list.
///
/// # Example
///
/// ```
/// use sandbox::ui::window::compute_window;
///
/// let items: Vec<u32> = (0..25).collect();
/// let window = compute_window(&items, 0, 10);
/// assert_eq!((window.start, window.end), (0, 9));
/// assert!(window.show_scroll_down);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// First visible index
    pub start: usize,
    /// Last visible index (inclusive)
    pub end: usize,
    /// Whether items exist above the window
    pub show_scroll_up: bool,
    /// Whether items exist below the window
    pub show_scroll_down: bool,
    /// Selection position as `"{selected + 1}/{len}"`
    pub scroll_position: String,
    len: usize,
}

impl Window {
    /// Half-open range of visible indices; empty for an empty list.
    pub const fn visible_range(&self) -> Range<usize> {
        if self.len == 0 {
            0..0
        } else {
            self.start..self.end + 1
        }
    }

    /// Number of items hidden above the window.
    pub const fn hidden_above(&self) -> usize {
        self.start
    }

    /// Number of items hidden below the window.
    pub const fn hidden_below(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.len - 1 - self.end
        }
    }

    /// Whether either scroll indicator is shown.
    pub const fn is_scrolling(&self) -> bool {
        self.show_scroll_up || self.show_scroll_down
    }

    /// Borrow the visible items out of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.visible_range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }
}

/// Compute the window of `items` to show for `selected_index` and `capacity`.
///
/// A capacity of zero behaves like one, and a selection past the end is
/// clamped to the last item.
pub fn compute_window<T>(items: &[T], selected_index: usize, capacity: usize) -> Window {
    let len = items.len();
    let capacity = capacity.max(1);

    if len == 0 {
        return Window {
            start: 0,
            end: 0,
            show_scroll_up: false,
            show_scroll_down: false,
            scroll_position: "0/0".to_string(),
            len,
        };
    }

    let selected = selected_index.min(len - 1);
    let scroll_position = format!("{}/{}", selected + 1, len);

    if len <= capacity {
        return Window {
            start: 0,
            end: len - 1,
            show_scroll_up: false,
            show_scroll_down: false,
            scroll_position,
            len,
        };
    }

    let mut start = selected.saturating_sub(capacity / 2);
    let end = (start + capacity - 1).min(len - 1);
    // Never leave empty rows at the bottom.
    if end == len - 1 {
        start = len.saturating_sub(capacity);
    }

    Window {
        start,
        end,
        show_scroll_up: start > 0,
        show_scroll_down: end < len - 1,
        scroll_position,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_short_list_shows_everything() {
        let window = compute_window(&list(5), 3, 10);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 4);
        assert!(!window.show_scroll_up);
        assert!(!window.show_scroll_down);
        assert_eq!(window.visible_range(), 0..5);
    }

    #[test]
    fn test_exact_fit_does_not_scroll() {
        let window = compute_window(&list(10), 9, 10);
        assert_eq!((window.start, window.end), (0, 9));
        assert!(!window.is_scrolling());
    }

    #[test]
    fn test_first_item_selected_in_long_list() {
        let window = compute_window(&list(25), 0, 10);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 9);
        assert!(!window.show_scroll_up);
        assert!(window.show_scroll_down);
        assert_eq!(window.scroll_position, "1/25");
    }

    #[test]
    fn test_last_item_selected_in_long_list() {
        let window = compute_window(&list(25), 24, 10);
        assert_eq!(window.start, 15);
        assert_eq!(window.end, 24);
        assert!(window.show_scroll_up);
        assert!(!window.show_scroll_down);
        assert_eq!(window.scroll_position, "25/25");
    }

    #[test]
    fn test_middle_selection_is_centered() {
        let window = compute_window(&list(25), 12, 10);
        assert_eq!(window.start, 7);
        assert_eq!(window.end, 16);
        assert!(window.show_scroll_up);
        assert!(window.show_scroll_down);
        assert_eq!(window.hidden_above(), 7);
        assert_eq!(window.hidden_below(), 8);
    }

    #[test]
    fn test_near_end_pulls_start_back() {
        let window = compute_window(&list(25), 21, 10);
        assert_eq!((window.start, window.end), (15, 24));
    }

    #[test]
    fn test_empty_list_yields_empty_window() {
        let window = compute_window::<usize>(&[], 0, 10);
        assert_eq!(window.visible_range(), 0..0);
        assert_eq!(window.scroll_position, "0/0");
        assert_eq!(window.hidden_below(), 0);
    }

    #[test]
    fn test_zero_capacity_behaves_like_one() {
        let window = compute_window(&list(5), 2, 0);
        assert_eq!((window.start, window.end), (2, 2));
    }

    #[test]
    fn test_selection_past_end_is_clamped() {
        let window = compute_window(&list(25), 99, 10);
        assert_eq!((window.start, window.end), (15, 24));
        assert_eq!(window.scroll_position, "25/25");
    }

    #[test]
    fn test_slice_returns_visible_items() {
        let items = list(25);
        let window = compute_window(&items, 12, 4);
        assert_eq!(window.slice(&items), &[10, 11, 12, 13]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn selection_always_inside_window(
                len in 1..500usize,
                selected in 0..500usize,
                capacity in 1..100usize,
            ) {
                let selected = selected % len;
                let window = compute_window(&list(len), selected, capacity);
                prop_assert!(window.start <= selected);
                prop_assert!(selected <= window.end);
            }

            #[test]
            fn window_never_exceeds_capacity_or_bounds(
                len in 1..500usize,
                selected in 0..500usize,
                capacity in 1..100usize,
            ) {
                let selected = selected % len;
                let window = compute_window(&list(len), selected, capacity);
                prop_assert!(window.end - window.start + 1 <= capacity);
                prop_assert!(window.end <= len - 1);
            }

            #[test]
            fn long_lists_fill_the_capacity(
                len in 1..500usize,
                selected in 0..500usize,
                capacity in 1..100usize,
            ) {
                let selected = selected % len;
                let window = compute_window(&list(len), selected, capacity);
                prop_assert_eq!(window.visible_range().len(), len.min(capacity));
            }
        }
    }
}
