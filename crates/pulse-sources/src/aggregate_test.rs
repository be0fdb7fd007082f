use chrono::{DateTime, Duration, TimeZone, Utc};
use pulse_core::ReviewSource;

use super::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 9, 0, 0).unwrap()
}

fn review(id: &str, date: DateTime<Utc>, source: ReviewSource) -> Review {
    Review {
        id: id.to_string(),
        user_name: "user".to_string(),
        user_image: None,
        date,
        score: 3,
        title: None,
        text: format!("review {id}"),
        url: None,
        version: None,
        source,
    }
}

fn ids(reviews: &[Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn twelve_week_window_keeps_recent_and_drops_old() {
    let window = ReviewWindow::trailing_days(now(), 84);
    let per_source = vec![
        vec![review("fresh", now() - Duration::days(1), ReviewSource::Marketplace)],
        vec![review("stale", now() - Duration::days(100), ReviewSource::Store)],
    ];

    let merged = aggregate(per_source, &window, DEFAULT_REVIEW_LIMIT);
    assert_eq!(ids(&merged), vec!["fresh"]);
}

#[test]
fn window_edges_are_inclusive() {
    let window = ReviewWindow::trailing_days(now(), 84);
    let per_source = vec![vec![
        review("start", window.start, ReviewSource::Store),
        review("end", window.end, ReviewSource::Store),
        review("future", now() + Duration::minutes(1), ReviewSource::Store),
    ]];

    let merged = aggregate(per_source, &window, DEFAULT_REVIEW_LIMIT);
    assert_eq!(ids(&merged), vec!["end", "start"]);
}

#[test]
fn output_is_newest_first_across_sources() {
    let window = ReviewWindow::trailing_days(now(), 84);
    let per_source = vec![
        vec![
            review("m-5", now() - Duration::days(5), ReviewSource::Marketplace),
            review("m-1", now() - Duration::days(1), ReviewSource::Marketplace),
        ],
        vec![
            review("s-3", now() - Duration::days(3), ReviewSource::Store),
            review("s-2", now() - Duration::days(2), ReviewSource::Store),
        ],
    ];

    let merged = aggregate(per_source, &window, DEFAULT_REVIEW_LIMIT);
    assert_eq!(ids(&merged), vec!["m-1", "s-2", "s-3", "m-5"]);
    assert!(merged.windows(2).all(|w| w[0].date >= w[1].date));
}

#[test]
fn equal_dates_keep_adapter_order() {
    let window = ReviewWindow::trailing_days(now(), 84);
    let same = now() - Duration::days(2);
    let per_source = vec![
        vec![review("first", same, ReviewSource::Marketplace)],
        vec![review("second", same, ReviewSource::Store)],
    ];

    let merged = aggregate(per_source, &window, DEFAULT_REVIEW_LIMIT);
    assert_eq!(ids(&merged), vec!["first", "second"]);
}

#[test]
fn limit_truncates_after_sorting() {
    let window = ReviewWindow::trailing_days(now(), 84);
    let per_source = vec![(0..10)
        .map(|days| {
            review(
                &format!("d{days}"),
                now() - Duration::days(days),
                ReviewSource::Marketplace,
            )
        })
        .rev()
        .collect()];

    let merged = aggregate(per_source, &window, 3);
    assert_eq!(ids(&merged), vec!["d0", "d1", "d2"]);
}

#[test]
fn empty_input_yields_empty_output() {
    let window = ReviewWindow::trailing_days(now(), 84);
    assert!(aggregate(vec![Vec::new(), Vec::new()], &window, 10).is_empty());
}
