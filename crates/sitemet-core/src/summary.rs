//! Summary statistics for the dashboard cards

use serde::{Deserialize, Serialize};

/// total/average/highest/lowest over one numeric series. The empty series
/// yields zeros, not nulls; the cards have always rendered "0.0" and the
/// convention is kept for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total: f64,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl SummaryStats {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                total: 0.0,
                average: 0.0,
                highest: 0.0,
                lowest: 0.0,
            };
        }

        let total: f64 = values.iter().sum();
        Self {
            total,
            average: total / values.len() as f64,
            highest: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            lowest: values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_series() {
        let stats = SummaryStats::of(&[2.0, 8.0, 5.0]);
        assert_eq!(stats.total, 15.0);
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.highest, 8.0);
        assert_eq!(stats.lowest, 2.0);
    }

    #[test]
    fn empty_series_yields_zeros() {
        let stats = SummaryStats::of(&[]);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.highest, 0.0);
        assert_eq!(stats.lowest, 0.0);
    }

    #[test]
    fn single_value() {
        let stats = SummaryStats::of(&[3.5]);
        assert_eq!(stats.highest, 3.5);
        assert_eq!(stats.lowest, 3.5);
        assert_eq!(stats.average, 3.5);
    }
}
