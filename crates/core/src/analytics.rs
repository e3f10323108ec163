//! Visitor and marketing aggregation.
//!
//! The database groups visitors by the month of their first visit; months
//! with nobody new are simply missing from that result. Everything here works
//! on the grouped rows so the dashboard math stays testable without a
//! database.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Label used for inquiries that left "How did you hear about us?" blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// How many months the dashboard chart shows.
pub const CHART_MONTHS: usize = 12;

/// Unique visitors first seen in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// First day of the month.
    pub month: NaiveDate,
    pub count: i64,
}

impl MonthlyCount {
    /// Count for the month containing `date`.
    #[must_use]
    pub fn new(date: NaiveDate, count: i64) -> Self {
        Self {
            month: first_of_month(date),
            count,
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        month_label(self.month)
    }
}

/// Chart label for a month, e.g. `Mar 2024`.
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Calendar day a visit at `now` is filed under.
///
/// Visits are recorded and summarised on the UTC calendar, whatever zone the
/// database or the dashboard runs in.
#[must_use]
pub fn visit_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sort `counts` and insert zero rows for every missing month between the
/// earliest and the latest.
///
/// Counts that land in the same month are summed.
#[must_use]
pub fn fill_month_gaps(counts: &[MonthlyCount]) -> Vec<MonthlyCount> {
    let mut sorted: Vec<MonthlyCount> = counts
        .iter()
        .map(|c| MonthlyCount::new(c.month, c.count))
        .collect();
    sorted.sort_by_key(|c| c.month);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let (mut cursor, end) = (first.month, last.month);

    let mut filled = Vec::new();
    while cursor <= end {
        let count = sorted
            .iter()
            .filter(|c| c.month == cursor)
            .map(|c| c.count)
            .sum();
        filled.push(MonthlyCount {
            month: cursor,
            count,
        });
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    filled
}

/// Dashboard visitor figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorSummary {
    pub total: i64,
    /// Total divided by the number of months on record, to two places.
    pub average_per_month: Decimal,
    pub this_month: i64,
    /// At most the last [`CHART_MONTHS`] months, oldest first.
    pub recent: Vec<MonthlyCount>,
}

impl VisitorSummary {
    /// Summarise gap-filled monthly counts as of `today`.
    #[must_use]
    pub fn from_months(months: &[MonthlyCount], today: NaiveDate) -> Self {
        let total: i64 = months.iter().map(|m| m.count).sum();

        let average_per_month = match i64::try_from(months.len()) {
            Ok(n) if n > 0 => (Decimal::from(total) / Decimal::from(n))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            _ => Decimal::ZERO,
        };

        let current = first_of_month(today);
        let this_month = months
            .iter()
            .find(|m| m.month == current)
            .map_or(0, |m| m.count);

        let skip = months.len().saturating_sub(CHART_MONTHS);
        let recent = months.iter().skip(skip).copied().collect();

        Self {
            total,
            average_per_month,
            this_month,
            recent,
        }
    }

    /// Chart labels for [`Self::recent`].
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.recent.iter().map(MonthlyCount::label).collect()
    }

    /// Chart values for [`Self::recent`].
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.recent.iter().map(|m| m.count).collect()
    }
}

/// How many inquiries named one marketing channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketingSource {
    pub label: String,
    pub count: i64,
}

/// Normalise a free-text "how did you hear" answer.
#[must_use]
pub fn source_label(how_hear: Option<&str>) -> String {
    match how_hear.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_owned(),
        _ => NOT_SPECIFIED.to_owned(),
    }
}

/// Merge raw per-answer counts into one row per normalised label, largest
/// first; ties are ordered by label.
#[must_use]
pub fn merge_sources<'a, I>(raw: I) -> Vec<MarketingSource>
where
    I: IntoIterator<Item = (Option<&'a str>, i64)>,
{
    let mut merged: Vec<MarketingSource> = Vec::new();
    for (answer, count) in raw {
        let label = source_label(answer);
        if let Some(existing) = merged.iter_mut().find(|s| s.label == label) {
            existing.count += count;
        } else {
            merged.push(MarketingSource { label, count });
        }
    }
    merged.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_visit_date_is_utc() {
        use chrono::TimeZone;

        // 23:30 in Chicago on Jan 31 is already Feb 1 in UTC
        let late = chrono::FixedOffset::west_opt(6 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 31, 23, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(visit_date(late), ymd(2024, 2, 1));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(ymd(2024, 3, 17)), "Mar 2024");
    }

    #[test]
    fn test_fill_month_gaps_inserts_zeros_across_year_end() {
        let filled = fill_month_gaps(&[
            MonthlyCount::new(ymd(2024, 2, 1), 4),
            MonthlyCount::new(ymd(2023, 11, 1), 2),
        ]);
        let counts: Vec<i64> = filled.iter().map(|m| m.count).collect();
        assert_eq!(counts, [2, 0, 0, 4]);
        assert_eq!(filled[1].label(), "Dec 2023");
        assert_eq!(filled[2].label(), "Jan 2024");
    }

    #[test]
    fn test_fill_month_gaps_empty() {
        assert!(fill_month_gaps(&[]).is_empty());
    }

    #[test]
    fn test_summary_average_rounds_to_two_places() {
        let months = fill_month_gaps(&[
            MonthlyCount::new(ymd(2024, 1, 1), 1),
            MonthlyCount::new(ymd(2024, 3, 1), 1),
        ]);
        let summary = VisitorSummary::from_months(&months, ymd(2024, 3, 20));

        assert_eq!(summary.total, 2);
        assert_eq!(summary.average_per_month, Decimal::new(67, 2));
        assert_eq!(summary.this_month, 1);
    }

    #[test]
    fn test_summary_with_no_months() {
        let summary = VisitorSummary::from_months(&[], ymd(2024, 3, 20));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_per_month, Decimal::ZERO);
        assert_eq!(summary.this_month, 0);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_summary_keeps_last_twelve_months() {
        let months = fill_month_gaps(&[
            MonthlyCount::new(ymd(2022, 1, 1), 5),
            MonthlyCount::new(ymd(2023, 6, 1), 1),
        ]);
        let summary = VisitorSummary::from_months(&months, ymd(2023, 6, 2));

        assert_eq!(summary.recent.len(), CHART_MONTHS);
        assert_eq!(summary.labels().first().unwrap(), "Jul 2022");
        assert_eq!(summary.values().last().copied(), Some(1));
        assert_eq!(summary.total, 6);
    }

    #[test]
    fn test_merge_sources_groups_blank_answers() {
        let merged = merge_sources([
            (Some("Facebook "), 2),
            (None, 1),
            (Some("  "), 2),
            (Some("Facebook"), 1),
            (Some("Ad"), 1),
        ]);

        assert_eq!(
            merged,
            vec![
                MarketingSource { label: "Facebook".into(), count: 3 },
                MarketingSource { label: NOT_SPECIFIED.into(), count: 3 },
                MarketingSource { label: "Ad".into(), count: 1 },
            ]
        );
    }
}
