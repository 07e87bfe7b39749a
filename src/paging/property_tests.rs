//! Property-Based Tests for the Pagination Engine

use proptest::prelude::*;

use crate::paging::{paginate, PageError};

fn item_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.]{0,80}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Concatenating pages 1..=total_pages yields the original items in order,
    // and total_pages = ceil(M / items_per_page).
    #[test]
    fn prop_pages_cover_items_exactly(
        items in prop::collection::vec(item_strategy(), 1..400),
        budget in 1usize..2_000,
    ) {
        let first = paginate(&items, 1, budget).unwrap();
        let total_pages = first.total_pages;
        prop_assert_eq!(total_pages, items.len().div_ceil(first.items_per_page));

        let mut rebuilt: Vec<String> = Vec::with_capacity(items.len());
        for number in 1..=total_pages {
            let page = paginate(&items, number as i64, budget).unwrap();
            prop_assert_eq!(page.total_pages, total_pages);
            prop_assert_eq!(page.items_per_page, first.items_per_page);
            prop_assert!(!page.items.is_empty());
            prop_assert!(page.items.len() <= page.items_per_page);
            prop_assert_eq!(page.first_item(), rebuilt.len() + 1);
            rebuilt.extend(page.items.iter().cloned());
        }

        prop_assert_eq!(rebuilt, items);
    }

    // Pages below 1 and page total_pages + 1 are rejected with the valid bound.
    #[test]
    fn prop_out_of_range_cites_bound(
        items in prop::collection::vec(item_strategy(), 1..200),
        budget in 1usize..1_000,
        below in -1_000i64..=0,
    ) {
        let total_pages = paginate(&items, 1, budget).unwrap().total_pages;
        let past_end = total_pages as i64 + 1;

        prop_assert_eq!(
            paginate(&items, below, budget),
            Err(PageError::OutOfRange { requested: below, total_pages })
        );
        prop_assert_eq!(
            paginate(&items, past_end, budget),
            Err(PageError::OutOfRange { requested: past_end, total_pages })
        );
    }

    // An empty result is page 1 of 1 for any requested page.
    #[test]
    fn prop_empty_is_always_first_page(requested in -1_000i64..1_000, budget in 0usize..10_000) {
        let items: Vec<String> = Vec::new();
        let page = paginate(&items, requested, budget).unwrap();

        prop_assert_eq!(page.page_number, 1);
        prop_assert_eq!(page.total_pages, 1);
        prop_assert!(page.items.is_empty());
    }

    // A larger budget never produces more pages.
    #[test]
    fn prop_budget_is_monotonic(
        items in prop::collection::vec(item_strategy(), 1..300),
        budget in 1usize..1_000,
        extra in 0usize..1_000,
    ) {
        let small = paginate(&items, 1, budget).unwrap();
        let large = paginate(&items, 1, budget + extra).unwrap();

        prop_assert!(large.total_pages <= small.total_pages);
    }
}
