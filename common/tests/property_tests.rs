// Property-based tests for the job list core
// Feature: spark-log-dashboard

use common::debounce::Debouncer;
use common::filters::{Filters, StatusFilter};
use common::page_size::PageSizeEstimator;
use common::pagination::Pagination;
use common::query::LogQuery;
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn status_strategy() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        Just(StatusFilter::Success),
        Just(StatusFilter::Error),
    ]
}

// Property 1: Page count and displayed range
// Feature: spark-log-dashboard, Property 1: Pagination arithmetic
// For any total T and page size s, the page count is ceil(T / s), and every
// reachable page shows a range inside [1, T].
proptest! {
    #[test]
    fn property_1_pagination_arithmetic(total in 0u64..5_000, page_size in 1u32..200) {
        let mut pagination = Pagination::new(page_size);
        pagination.set_total(total);

        let expected_pages = (total + u64::from(page_size) - 1) / u64::from(page_size);
        prop_assert_eq!(pagination.total_pages(), expected_pages);

        let mut visited = 1u64;
        while pagination.older().is_some() {
            visited += 1;
            prop_assert!(pagination.range_start() <= pagination.range_end());
            prop_assert!(pagination.range_end() <= total);
        }

        if total > 0 {
            prop_assert_eq!(visited, expected_pages);
            prop_assert_eq!(pagination.range_end(), total);
        } else {
            prop_assert_eq!(pagination.to_string(), "0–0 of 0");
        }
        prop_assert!(!pagination.can_go_older());
    }
}

// Property 2: Newer never leaves page 1
// Feature: spark-log-dashboard, Property 2: Navigation bounds
// For any sequence of newer/older steps the page stays in [1, max(1, pages)].
proptest! {
    #[test]
    fn property_2_navigation_bounds(
        total in 0u64..500,
        page_size in 1u32..50,
        steps in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        let mut pagination = Pagination::new(page_size);
        pagination.set_total(total);
        let last = pagination.total_pages().max(1);

        for older in steps {
            if older {
                pagination.older();
            } else {
                pagination.newer();
            }
            prop_assert!(pagination.page() >= 1);
            prop_assert!(u64::from(pagination.page()) <= last);
        }
    }
}

// Property 3: Page size is always at least one row
// Feature: spark-log-dashboard, Property 3: Page-size floor
proptest! {
    #[test]
    fn property_3_page_size_floor(
        viewport in any::<u16>(),
        row_height in any::<u16>(),
        reserved in any::<u16>(),
    ) {
        let estimator = PageSizeEstimator::new(row_height, reserved);
        let rows = estimator.estimate(viewport);
        prop_assert!(rows >= 1);

        if row_height > 0 {
            let usable = viewport.saturating_sub(reserved);
            prop_assert_eq!(rows, usize::from(usable / row_height).max(1));
        }
    }
}

// Property 4: Only the last value of a burst settles
// Feature: spark-log-dashboard, Property 4: Debounce latest-wins
// For any burst of edits spaced closer than the delay, nothing settles until
// the delay has passed after the last edit, and then exactly the last value.
proptest! {
    #[test]
    fn property_4_debounce_latest_wins(
        values in prop::collection::vec("[a-z]{0,8}", 1..20),
        gaps in prop::collection::vec(0u64..999, 20),
    ) {
        let delay = Duration::from_millis(1000);
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), delay);

        let mut now = start;
        for (value, gap) in values.iter().zip(gaps.iter()) {
            now += Duration::from_millis(*gap);
            prop_assert!(debouncer.poll(now).is_none());
            debouncer.set(value.clone(), now);
        }

        prop_assert!(debouncer.poll(now + delay - Duration::from_millis(1)).is_none());
        let settled = debouncer.poll(now + delay);
        prop_assert_eq!(settled.as_ref(), values.last());
        prop_assert!(debouncer.poll(now + delay * 5).is_none());
    }
}

// Property 5: Unset filters never reach the query string
// Feature: spark-log-dashboard, Property 5: Query parameter omission
proptest! {
    #[test]
    fn property_5_query_parameter_omission(
        page in 1u32..1000,
        page_size in 1u32..100,
        search in "[a-z ]{0,12}",
        status in status_strategy(),
    ) {
        let filters = Filters {
            search: search.clone(),
            status,
            ..Filters::default()
        };
        let params = LogQuery::new(page, page_size, filters).to_params();
        let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

        prop_assert_eq!(&names[..2], &["page", "pageSize"]);
        prop_assert_eq!(names.contains(&"search"), !search.trim().is_empty());
        prop_assert_eq!(names.contains(&"status"), status != StatusFilter::All);
        prop_assert!(!names.contains(&"startDate"));
        prop_assert!(!names.contains(&"endDate"));
    }
}
