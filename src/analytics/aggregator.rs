//! Channel Aggregator
//!
//! Turns the raw linked-URL list and monthly view rows of one user into
//! per-channel summaries. Pure: no I/O, no clock, no randomness.
//!
//! For each channel the records are ordered by month, most recent first.
//! When two records share a channel and month, the first one encountered
//! represents that month; later duplicates only add to the cumulative
//! view count.

use std::collections::{HashMap, HashSet};

use super::error::{AnalyticsError, AnalyticsResult};
use super::types::{LinkedChannel, Month, MonthlyViewRecord};

/// Aggregate view records into one summary per linked channel
///
/// Output follows the order of `urls`. Duplicate URLs are collapsed to
/// their first occurrence. Returns [`AnalyticsError::NoChannelsLinked`]
/// when `urls` is empty.
pub fn aggregate<S: AsRef<str>>(
    urls: &[S],
    records: &[MonthlyViewRecord],
) -> AnalyticsResult<Vec<LinkedChannel>> {
    if urls.is_empty() {
        return Err(AnalyticsError::NoChannelsLinked);
    }

    let mut by_channel: HashMap<&str, Vec<&MonthlyViewRecord>> = HashMap::new();
    for record in records {
        by_channel
            .entry(record.channel_url.as_str())
            .or_default()
            .push(record);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(urls.len());
    let mut channels = Vec::with_capacity(urls.len());
    for url in urls {
        let url: &str = url.as_ref();
        if !seen.insert(url) {
            continue;
        }
        channels.push(match by_channel.get(url) {
            Some(history) => summarize(url, history),
            None => LinkedChannel::empty(url),
        });
    }

    Ok(channels)
}

/// Percent change from `previous` to `current`
///
/// Returns 0 when there is no baseline (`previous == 0`).
pub fn growth_percent(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

fn summarize(url: &str, history: &[&MonthlyViewRecord]) -> LinkedChannel {
    let total = history.iter().fold(0u64, |acc, r| acc.saturating_add(r.views));

    // Stable sort keeps first-encountered records ahead within a month.
    let mut ordered: Vec<&MonthlyViewRecord> = history.to_vec();
    ordered.sort_by(|a, b| b.month.cmp(&a.month));

    let mut months: Vec<(Month, u64)> = Vec::with_capacity(2);
    for record in ordered {
        if months.last().map(|(m, _)| *m) == Some(record.month) {
            continue;
        }
        months.push((record.month, record.views));
        if months.len() == 2 {
            break;
        }
    }

    let current = months.first().map(|(_, v)| *v).unwrap_or(0);
    let previous = months.get(1).map(|(_, v)| *v).unwrap_or(0);

    LinkedChannel {
        views: total,
        monthly_views: current,
        growth: growth_percent(current, previous),
        ..LinkedChannel::empty(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "https://www.youtube.com/@alpha";
    const B: &str = "https://www.youtube.com/@beta";

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn record(url: &str, y: i32, m: u32, views: u64) -> MonthlyViewRecord {
        MonthlyViewRecord::new(url, month(y, m), views)
    }

    #[test]
    fn test_empty_url_list_is_no_channels_linked() {
        let urls: Vec<String> = Vec::new();
        let result = aggregate(&urls, &[record(A, 2025, 1, 10)]);

        assert!(matches!(result, Err(AnalyticsError::NoChannelsLinked)));
    }

    #[test]
    fn test_one_summary_per_url_in_order() {
        let records = vec![record(B, 2025, 2, 5), record(A, 2025, 2, 7)];
        let channels = aggregate(&[A, B], &records).unwrap();

        let urls: Vec<&str> = channels.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec![A, B]);
    }

    #[test]
    fn test_duplicate_urls_collapse() {
        let channels = aggregate(&[A, B, A], &[]).unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].url, A);
        assert_eq!(channels[1].url, B);
    }

    #[test]
    fn test_channel_without_records_is_zeroed() {
        let channels = aggregate(&[A], &[record(B, 2025, 1, 99)]).unwrap();
        let channel = &channels[0];

        assert_eq!(channel.views, 0);
        assert_eq!(channel.monthly_views, 0);
        assert_eq!(channel.growth, 0.0);
        assert_eq!(channel.subscribers, None);
    }

    #[test]
    fn test_growth_against_previous_month() {
        let records = vec![record(A, 2025, 2, 150), record(A, 2025, 1, 100)];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.monthly_views, 150);
        assert_eq!(channel.views, 250);
        assert!((channel.growth - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_baseline_gives_zero_growth() {
        let records = vec![record(A, 2025, 2, 50), record(A, 2025, 1, 0)];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.growth, 0.0);
        assert!(channel.growth.is_finite());
    }

    #[test]
    fn test_single_month_has_no_baseline() {
        let channel = &aggregate(&[A], &[record(A, 2025, 3, 40)]).unwrap()[0];

        assert_eq!(channel.monthly_views, 40);
        assert_eq!(channel.views, 40);
        assert_eq!(channel.growth, 0.0);
    }

    #[test]
    fn test_negative_growth() {
        let records = vec![record(A, 2025, 1, 200), record(A, 2025, 2, 50)];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.monthly_views, 50);
        assert!((channel.growth + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_unordered_records_are_sorted_by_month() {
        let records = vec![
            record(A, 2024, 11, 10),
            record(A, 2025, 1, 30),
            record(A, 2024, 12, 20),
        ];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.monthly_views, 30);
        assert!((channel.growth - 50.0).abs() < 1e-9);
        assert_eq!(channel.views, 60);
    }

    #[test]
    fn test_same_month_duplicates_use_first_encountered() {
        let records = vec![
            record(A, 2025, 2, 300),
            record(A, 2025, 2, 999),
            record(A, 2025, 1, 200),
        ];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.monthly_views, 300);
        assert!((channel.growth - 50.0).abs() < 1e-9);
        assert_eq!(channel.views, 1499);

        // Reordering the duplicates flips which one wins, the rule holds.
        let records = vec![
            record(A, 2025, 1, 200),
            record(A, 2025, 2, 999),
            record(A, 2025, 2, 300),
        ];
        let channel = &aggregate(&[A], &records).unwrap()[0];
        assert_eq!(channel.monthly_views, 999);
    }

    #[test]
    fn test_total_views_saturate() {
        let records = vec![
            record(A, 2025, 2, u64::MAX - 10),
            record(A, 2025, 1, u64::MAX - 10),
        ];
        let channel = &aggregate(&[A], &records).unwrap()[0];

        assert_eq!(channel.views, u64::MAX);
        assert_eq!(channel.monthly_views, u64::MAX - 10);
    }

    #[test]
    fn test_growth_percent() {
        assert_eq!(growth_percent(150, 100), 50.0);
        assert_eq!(growth_percent(50, 0), 0.0);
        assert_eq!(growth_percent(0, 0), 0.0);
        assert_eq!(growth_percent(0, 100), -100.0);
    }
}
