//! Small view types shared by the admin templates.

use prosper_core::analytics::{MarketingSource, MonthlyCount};

use crate::models::CurrentAdmin;

/// Admin user view for the page header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub first_name: String,
    pub username: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            first_name: admin.first_name.clone(),
            username: admin.username.clone(),
        }
    }
}

/// One bar of a horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarView {
    pub label: String,
    pub value: i64,
    /// Width relative to the largest bar, 0-100
    pub percent: i64,
}

/// Scale `(label, value)` pairs against the largest value.
pub fn bars<I>(points: I) -> Vec<BarView>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let points: Vec<(String, i64)> = points.into_iter().collect();
    let max = points.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);

    points
        .into_iter()
        .map(|(label, value)| BarView {
            percent: value.max(0) * 100 / max,
            label,
            value,
        })
        .collect()
}

#[must_use]
pub fn month_bars(months: &[MonthlyCount]) -> Vec<BarView> {
    bars(months.iter().map(|m| (m.label(), m.count)))
}

#[must_use]
pub fn source_bars(sources: &[MarketingSource]) -> Vec<BarView> {
    bars(sources.iter().map(|s| (s.label.clone(), s.count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scale_to_largest() {
        let scaled = bars([("a".to_string(), 5), ("b".to_string(), 10), ("c".to_string(), 0)]);
        let percents: Vec<i64> = scaled.iter().map(|b| b.percent).collect();
        assert_eq!(percents, [50, 100, 0]);
    }

    #[test]
    fn test_bars_all_zero() {
        let scaled = bars([("Jan 2024".to_string(), 0)]);
        assert_eq!(scaled[0].percent, 0);
        assert!(bars(Vec::new()).is_empty());
    }
}
