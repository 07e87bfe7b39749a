//! Pagination Engine
//!
//! Splits a full result into pages sized by estimated token cost instead of
//! a fixed row count. Pages borrow the full result and never copy it.

use serde::Serialize;
use thiserror::Error;

use crate::paging::estimator::tokens_per_item;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Requested page outside `1..=total_pages`
    #[error("page {requested} is out of range: valid pages are 1 to {total_pages}")]
    OutOfRange { requested: i64, total_pages: usize },
}

// == Page ==
/// One navigable slice of a larger result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page index
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
    pub tokens_per_item: f64,
    pub estimated_tokens_used: f64,
    pub token_budget: usize,
}

impl<'a, T> Page<'a, T> {
    /// 1-based index of the first item shown, 0 when the page is empty.
    pub fn first_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.items_per_page + 1
        }
    }

    /// 1-based index of the last item shown, 0 when the page is empty.
    pub fn last_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item() + self.items.len() - 1
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Item range (1-based, inclusive) of the following page.
    pub fn next_range(&self) -> Option<(usize, usize)> {
        self.has_next().then(|| {
            let start = self.last_item() + 1;
            (start, (start + self.items_per_page - 1).min(self.total_items))
        })
    }

    /// Item range (1-based, inclusive) of the preceding page.
    pub fn previous_range(&self) -> Option<(usize, usize)> {
        self.has_previous().then(|| {
            let end = (self.page_number - 1) * self.items_per_page;
            (end + 1 - self.items_per_page, end)
        })
    }
}

/// Number of items that fit a token budget given a per-item estimate.
///
/// A zero estimate falls back to one item per page.
pub fn items_per_page(token_budget: usize, tokens_per_item: f64) -> usize {
    if tokens_per_item <= 0.0 || !tokens_per_item.is_finite() {
        return 1;
    }
    ((token_budget as f64 / tokens_per_item).floor() as usize).max(1)
}

// == Paginate ==
/// Returns page `requested_page` (1-based) of `items` under `token_budget`.
///
/// An empty result is always page 1 of 1, whatever page was asked for,
/// including zero or negative pages. Page boundaries depend only on `items`
/// and `token_budget`.
pub fn paginate<T: Serialize>(
    items: &[T],
    requested_page: i64,
    token_budget: usize,
) -> Result<Page<'_, T>, PageError> {
    if items.is_empty() {
        return Ok(Page {
            items,
            page_number: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: 1,
            tokens_per_item: 0.0,
            estimated_tokens_used: 0.0,
            token_budget,
        });
    }

    let tokens_per_item = tokens_per_item(items);
    let per_page = items_per_page(token_budget, tokens_per_item);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let page_number = match usize::try_from(requested_page) {
        Ok(n) if (1..=total_pages).contains(&n) => n,
        _ => {
            return Err(PageError::OutOfRange {
                requested: requested_page,
                total_pages,
            })
        }
    };

    let start = (page_number - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let slice = &items[start..end];

    Ok(Page {
        items: slice,
        page_number,
        total_pages,
        total_items,
        items_per_page: per_page,
        tokens_per_item,
        estimated_tokens_used: slice.len() as f64 * tokens_per_item,
        token_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Items that each estimate to exactly 10 tokens.
    fn ten_token_items(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{:038}", i)).collect()
    }

    #[test]
    fn test_last_page_is_partial() {
        // 487 items at 50 per page -> 10 pages, the last holding 451..=487
        let items = ten_token_items(487);
        let page = paginate(&items, 10, 500).unwrap();

        assert_eq!(page.items_per_page, 50);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.items.len(), 37);
        assert_eq!((page.first_item(), page.last_item()), (451, 487));
        assert_eq!(page.items[0], items[450]);
        assert_eq!(page.estimated_tokens_used, 370.0);
        assert!(!page.has_next());
        assert_eq!(page.previous_range(), Some((401, 450)));
    }

    #[test]
    fn test_middle_page_navigation() {
        let items = ten_token_items(487);
        let page = paginate(&items, 2, 500).unwrap();

        assert_eq!((page.first_item(), page.last_item()), (51, 100));
        assert_eq!(page.next_range(), Some((101, 150)));
        assert_eq!(page.previous_range(), Some((1, 50)));
    }

    #[test]
    fn test_next_range_clamped_to_total() {
        let items = ten_token_items(487);
        let page = paginate(&items, 9, 500).unwrap();

        assert_eq!(page.next_range(), Some((451, 487)));
    }

    #[test]
    fn test_empty_result_is_single_page() {
        let items: Vec<String> = Vec::new();

        for requested in [-2, 0, 1, 7] {
            let page = paginate(&items, requested, 6000).unwrap();
            assert_eq!(page.page_number, 1);
            assert_eq!(page.total_pages, 1);
            assert_eq!(page.total_items, 0);
            assert!(page.items.is_empty());
            assert_eq!((page.first_item(), page.last_item()), (0, 0));
            assert!(!page.has_next() && !page.has_previous());
        }
    }

    #[test]
    fn test_out_of_range_pages() {
        let items = ten_token_items(487);

        assert_eq!(
            paginate(&items, 0, 500),
            Err(PageError::OutOfRange {
                requested: 0,
                total_pages: 10
            })
        );
        assert_eq!(
            paginate(&items, -4, 500),
            Err(PageError::OutOfRange {
                requested: -4,
                total_pages: 10
            })
        );
        assert_eq!(
            paginate(&items, 11, 500),
            Err(PageError::OutOfRange {
                requested: 11,
                total_pages: 10
            })
        );
    }

    #[test]
    fn test_out_of_range_message_names_valid_bounds() {
        let err = PageError::OutOfRange {
            requested: 12,
            total_pages: 3,
        };
        assert_eq!(
            err.to_string(),
            "page 12 is out of range: valid pages are 1 to 3"
        );
    }

    #[test]
    fn test_budget_smaller_than_one_item() {
        let items = ten_token_items(3);
        let page = paginate(&items, 3, 1).unwrap();

        assert_eq!(page.items_per_page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, &items[2..3]);
    }

    #[test]
    fn test_items_per_page_floor() {
        assert_eq!(items_per_page(6000, 0.0), 1);
        assert_eq!(items_per_page(6000, f64::NAN), 1);
        assert_eq!(items_per_page(100, 30.0), 3);
        assert_eq!(items_per_page(0, 5.0), 1);
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let items = ten_token_items(120);
        let first = paginate(&items, 2, 333).unwrap();
        let second = paginate(&items, 2, 333).unwrap();

        assert_eq!(first, second);
    }
}
