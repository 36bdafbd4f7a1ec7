//! Page-window computation for pagination controls.
//!
//! The window is a contiguous run of at most `max_visible` page numbers that
//! slides with the current page and pins to either edge of the collection.
//! With `max_visible = 5`:
//!
//! | current page            | window                    |
//! |-------------------------|---------------------------|
//! | any, `total <= 5`       | `1 ..= total`             |
//! | `<= 3`                  | `1 ..= 5`                 |
//! | `>= total - 2`          | `total - 4 ..= total`     |
//! | otherwise               | `current - 2 ..= current + 2` |
//!
//! No gap markers are produced by [`compute_window`]; [`PageWindow::with_edges`]
//! is available for layouts that also want the first and last page.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of page links shown.
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// One pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

/// Derived pagination controls for one page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageWindow {
    pub tokens: Vec<PageToken>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Compute the visible page window.
///
/// `current_page` is clamped into `[1, total_pages]` and `total_pages` is
/// treated as at least one.
pub fn compute_window(current_page: u32, total_pages: u32, max_visible: u32) -> PageWindow {
    let total = total_pages.max(1);
    let max = max_visible.max(1);
    let current = current_page.clamp(1, total);

    let (start, end) = if total <= max {
        (1, total)
    } else {
        let lead = max / 2;
        let trail = max - 1 - lead;
        if current <= lead + 1 {
            (1, max)
        } else if current + trail >= total {
            (total - max + 1, total)
        } else {
            (current - lead, current + trail)
        }
    };

    PageWindow {
        tokens: (start..=end).map(PageToken::Page).collect(),
        current_page: current,
        total_pages: total,
        has_previous: current > 1,
        has_next: current < total,
    }
}

impl PageWindow {
    /// Page numbers in the window, in order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            PageToken::Page(n) => Some(*n),
            PageToken::Ellipsis => None,
        })
    }

    /// Whether controls should be rendered at all.
    pub fn is_navigable(&self) -> bool {
        self.total_pages > 1
    }

    /// Extend the window with the first and last page, marking skipped runs.
    pub fn with_edges(mut self) -> Self {
        let (Some(first), Some(last)) = (self.pages().next(), self.pages().last()) else {
            return self;
        };

        let mut tokens = Vec::with_capacity(self.tokens.len() + 4);
        if first > 1 {
            tokens.push(PageToken::Page(1));
            if first > 2 {
                tokens.push(PageToken::Ellipsis);
            }
        }
        tokens.append(&mut self.tokens);
        if last < self.total_pages {
            if last + 1 < self.total_pages {
                tokens.push(PageToken::Ellipsis);
            }
            tokens.push(PageToken::Page(self.total_pages));
        }

        self.tokens = tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(window: &PageWindow) -> Vec<u32> {
        window.pages().collect()
    }

    #[test]
    fn test_small_collections_show_every_page() {
        for total in 1..=5 {
            for current in 1..=total {
                let window = compute_window(current, total, 5);
                assert_eq!(pages(&window), (1..=total).collect::<Vec<_>>(), "current={current} total={total}");
            }
        }
    }

    #[test]
    fn test_head_zone_starts_at_one() {
        for total in 6..=40 {
            for current in 1..=3 {
                let window = compute_window(current, total, 5);
                assert_eq!(pages(&window), vec![1, 2, 3, 4, 5], "current={current} total={total}");
            }
        }
    }

    #[test]
    fn test_tail_zone_ends_at_total() {
        for total in 6..=40 {
            for current in (total - 2)..=total {
                let window = compute_window(current, total, 5);
                let got = pages(&window);
                assert_eq!(got.len(), 5);
                assert_eq!(got.last().copied(), Some(total), "current={current} total={total}");
                assert_eq!(got[0], total - 4);
            }
        }
    }

    #[test]
    fn test_middle_zone_centers_current() {
        for total in 6..=40 {
            for current in 4..(total - 2) {
                let window = compute_window(current, total, 5);
                assert_eq!(pages(&window), (current - 2..=current + 2).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_previous_next_availability() {
        let window = compute_window(1, 10, 5);
        assert!(!window.has_previous);
        assert!(window.has_next);

        let window = compute_window(10, 10, 5);
        assert!(window.has_previous);
        assert!(!window.has_next);

        let window = compute_window(1, 1, 5);
        assert!(!window.has_previous);
        assert!(!window.has_next);
        assert!(!window.is_navigable());
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        let window = compute_window(0, 10, 5);
        assert_eq!(window.current_page, 1);
        assert_eq!(pages(&window), vec![1, 2, 3, 4, 5]);

        let window = compute_window(99, 10, 5);
        assert_eq!(window.current_page, 10);
        assert_eq!(pages(&window), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_zero_total_pages_treated_as_one() {
        let window = compute_window(1, 0, 5);
        assert_eq!(window.total_pages, 1);
        assert_eq!(pages(&window), vec![1]);
    }

    #[test]
    fn test_other_window_sizes_stay_contiguous() {
        for max in 1..=8 {
            for total in 1..=20 {
                for current in 1..=total {
                    let got = pages(&compute_window(current, total, max));
                    assert_eq!(got.len() as u32, max.min(total));
                    assert!(got.contains(&current), "max={max} total={total} current={current}");
                    assert!(got.windows(2).all(|w| w[1] == w[0] + 1));
                    assert!(*got.last().unwrap() <= total);
                }
            }
        }
    }

    #[test]
    fn test_with_edges_marks_gaps() {
        let window = compute_window(10, 20, 5).with_edges();
        assert_eq!(
            window.tokens,
            vec![
                PageToken::Page(1),
                PageToken::Ellipsis,
                PageToken::Page(8),
                PageToken::Page(9),
                PageToken::Page(10),
                PageToken::Page(11),
                PageToken::Page(12),
                PageToken::Ellipsis,
                PageToken::Page(20),
            ]
        );
    }

    #[test]
    fn test_with_edges_adjacent_pages_skip_marker() {
        let window = compute_window(4, 7, 5).with_edges();
        assert_eq!(
            window.tokens,
            vec![
                PageToken::Page(1),
                PageToken::Page(2),
                PageToken::Page(3),
                PageToken::Page(4),
                PageToken::Page(5),
                PageToken::Page(6),
                PageToken::Page(7),
            ]
        );
    }
}
