//! Historical trend analysis over per-category cutoff series. Series are
//! treated positionally (x = 0..n-1), not by calendar year.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::models::HistoricalDataPoint;
use crate::policy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    pub slope: f64,
    pub direction: TrendDirection,
    pub confidence: f64,
    pub volatility: f64,
}

impl TrendAnalysis {
    fn flat() -> TrendAnalysis {
        TrendAnalysis {
            slope: 0.0,
            direction: TrendDirection::Stable,
            confidence: 0.0,
            volatility: 0.0,
        }
    }
}

/// Ordinary least-squares fit against positional indices. Fewer than two
/// points returns slope 0, intercept = first value (or 0) and r-squared 0;
/// callers branch on that degenerate shape.
pub fn linear_regression(values: &[f64]) -> Regression {
    let n = values.len();
    if n < 2 {
        return Regression {
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
            r_squared: 0.0,
        };
    }

    let count = n as f64;
    let x_mean = (0..n).map(|i| i as f64).sum::<f64>() / count;
    let y_mean = values.iter().sum::<f64>() / count;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, value) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (value - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    };
    let intercept = y_mean - slope * x_mean;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, value) in values.iter().enumerate() {
        let fitted = slope * i as f64 + intercept;
        ss_res += (value - fitted) * (value - fitted);
        ss_tot += (value - y_mean) * (value - y_mean);
    }

    // A flat series has no variance to explain; its fit quality stays 0.
    let r_squared = if ss_tot != 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Regression {
        slope,
        intercept,
        r_squared,
    }
}

/// Trailing moving average over the last `window` values.
pub fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let start = values.len().saturating_sub(window.max(1));
    let tail = &values[start..];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Population standard deviation; 0 for fewer than two values.
pub fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Observed cutoff ranks for one category, in series order. Years without
/// the category are skipped.
pub fn cutoff_series(history: &[HistoricalDataPoint], category: Category) -> Vec<f64> {
    history
        .iter()
        .filter_map(|point| point.cutoff.get(&category).map(|rank| f64::from(*rank)))
        .collect()
}

pub fn analyze_trend(history: &[HistoricalDataPoint], category: Category) -> TrendAnalysis {
    let values = cutoff_series(history, category);
    if values.len() < 2 {
        return TrendAnalysis::flat();
    }

    let regression = linear_regression(&values);
    let volatility = std_deviation(&values);

    let direction = if regression.slope.abs() > policy::TREND_SIGNIFICANCE_SLOPE {
        if regression.slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    } else {
        TrendDirection::Stable
    };

    TrendAnalysis {
        slope: regression.slope,
        direction,
        confidence: regression.r_squared.clamp(0.0, 1.0),
        volatility,
    }
}

/// Display sentences covering trend direction, fit confidence and
/// volatility for one category's history.
pub fn trend_insights(history: &[HistoricalDataPoint], category: Category) -> Vec<String> {
    if history.len() < 2 {
        return vec!["Limited historical data available".to_string()];
    }

    let trend = analyze_trend(history, category);
    let mut insights = Vec::new();

    match trend.direction {
        TrendDirection::Decreasing => insights.push(format!(
            "Cutoffs have been decreasing by ~{:.0} ranks/year (more competitive)",
            trend.slope.abs()
        )),
        TrendDirection::Increasing => insights.push(format!(
            "Cutoffs have been increasing by ~{:.0} ranks/year (less competitive)",
            trend.slope
        )),
        TrendDirection::Stable => {
            insights.push("Cutoffs have remained relatively stable over the years".to_string())
        }
    }

    if trend.confidence >= policy::HIGH_CONFIDENCE_R2 {
        insights.push(format!(
            "High confidence prediction ({:.0}% accuracy)",
            trend.confidence * 100.0
        ));
    } else if trend.confidence >= policy::LOW_CONFIDENCE_R2 {
        insights.push(format!(
            "Moderate confidence prediction ({:.0}% accuracy)",
            trend.confidence * 100.0
        ));
    } else {
        insights.push("Lower confidence due to data variability".to_string());
    }

    if trend.volatility > policy::HIGH_VOLATILITY {
        insights.push("High year-to-year variation observed".to_string());
    } else if trend.volatility < policy::QUIET_VOLATILITY {
        insights.push("Consistent trend with low variation".to_string());
    }

    insights
}
