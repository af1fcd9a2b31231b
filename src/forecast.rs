//! Next-year forecasts: fused cutoff prediction per category, plus
//! placement-rate and salary extrapolation.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::models::{Confidence, HistoricalDataPoint};
use crate::policy;
use crate::{boom, trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastMethod {
    #[serde(rename = "boom-score-only")]
    BoomScoreOnly,
    #[serde(rename = "ml-hybrid")]
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutoffForecast {
    pub predicted: u32,
    pub confidence: Confidence,
    pub method: ForecastMethod,
}

/// Predicts the next-year cutoff for one category by fusing the trend
/// extrapolation, the recent moving average and the boom adjustment.
/// The result never moves more than 30% away from the current cutoff.
pub fn predict_cutoff(
    current_cutoff: u32,
    history: &[HistoricalDataPoint],
    category: Category,
    boom_score: f64,
) -> CutoffForecast {
    let current = f64::from(current_cutoff);

    if history.len() < 2 {
        let predicted = (current * boom::cutoff_adjustment(boom_score)).round() as u32;
        return CutoffForecast {
            predicted,
            confidence: Confidence::Low,
            method: ForecastMethod::BoomScoreOnly,
        };
    }

    let series = trend::cutoff_series(history, category);
    let analysis = trend::analyze_trend(history, category);

    let trend_estimate = current + analysis.slope;

    let moving_avg = trend::moving_average(&series, policy::MOVING_AVERAGE_WINDOW);
    let avg_estimate =
        moving_avg + (current - moving_avg) * policy::MOVING_AVERAGE_CURRENT_BLEND;

    let boom_estimate = current * boom::cutoff_adjustment(boom_score);

    let trend_weight = analysis.confidence * policy::TREND_WEIGHT_CAP;
    let total_weight = trend_weight + policy::MOVING_AVERAGE_WEIGHT + policy::BOOM_WEIGHT;
    let fused = (trend_estimate * trend_weight
        + avg_estimate * policy::MOVING_AVERAGE_WEIGHT
        + boom_estimate * policy::BOOM_WEIGHT)
        / total_weight;

    let confidence = if analysis.confidence >= policy::HIGH_CONFIDENCE_R2
        && analysis.volatility < policy::LOW_VOLATILITY
    {
        Confidence::High
    } else if analysis.confidence < policy::LOW_CONFIDENCE_R2
        || analysis.volatility > policy::HIGH_VOLATILITY
    {
        Confidence::Low
    } else {
        Confidence::Medium
    };

    // Safety clamp, applied after fusion.
    let max_swing = current * policy::MAX_CUTOFF_SWING;
    let bounded = fused.clamp(current - max_swing, current + max_swing);

    CutoffForecast {
        predicted: bounded.round() as u32,
        confidence,
        method: ForecastMethod::Hybrid,
    }
}

/// Next-year placement rate from the historical series, clamped to [0, 1].
pub fn predict_placement_rate(history: &[HistoricalDataPoint]) -> f64 {
    if history.len() < 2 {
        return policy::DEFAULT_PLACEMENT_RATE;
    }

    let rates: Vec<f64> = history.iter().filter_map(|point| point.placement_rate).collect();
    if rates.len() < 2 {
        return rates.first().copied().unwrap_or(policy::DEFAULT_PLACEMENT_RATE);
    }

    let fit = trend::linear_regression(&rates);
    let predicted = fit.slope * rates.len() as f64 + fit.intercept;
    predicted.clamp(0.0, 1.0)
}

/// Next-year average salary from the historical series, clamped to a
/// plausible range.
pub fn predict_avg_salary(history: &[HistoricalDataPoint]) -> f64 {
    if history.len() < 2 {
        return policy::DEFAULT_AVG_SALARY;
    }

    let salaries: Vec<f64> = history.iter().filter_map(|point| point.avg_salary).collect();
    if salaries.len() < 2 {
        return salaries.first().copied().unwrap_or(policy::DEFAULT_AVG_SALARY);
    }

    let fit = trend::linear_regression(&salaries);
    let predicted = fit.slope * salaries.len() as f64 + fit.intercept;
    predicted.clamp(policy::MIN_FORECAST_SALARY, policy::MAX_FORECAST_SALARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn cutoff_history(ranks: &[(i32, u32)]) -> Vec<HistoricalDataPoint> {
        ranks
            .iter()
            .map(|(year, rank)| HistoricalDataPoint {
                year: *year,
                cutoff: BTreeMap::from([(Category::Gm, *rank)]),
                placement_rate: None,
                avg_salary: None,
                students_admitted: None,
                students_placed: None,
            })
            .collect()
    }

    fn metric_history(points: &[(i32, Option<f64>, Option<f64>)]) -> Vec<HistoricalDataPoint> {
        points
            .iter()
            .map(|(year, rate, salary)| HistoricalDataPoint {
                year: *year,
                cutoff: BTreeMap::new(),
                placement_rate: *rate,
                avg_salary: *salary,
                students_admitted: None,
                students_placed: None,
            })
            .collect()
    }

    #[test]
    fn falls_back_to_boom_adjustment_without_history() {
        let forecast = predict_cutoff(1000, &[], Category::Gm, 0.9);
        // Booming at 0.9 tightens by 20%.
        assert_eq!(forecast.predicted, 800);
        assert_eq!(forecast.confidence, Confidence::Low);
        assert_eq!(forecast.method, ForecastMethod::BoomScoreOnly);
    }

    #[test]
    fn fuses_trend_average_and_boom_estimates() {
        let history = cutoff_history(&[(2022, 1200), (2023, 1100), (2024, 1000)]);
        let forecast = predict_cutoff(1000, &history, Category::Gm, 0.5);
        // trend 900 * 0.5 + blended average 1050 * 0.3 + boom 1058.33 * 0.2
        assert_eq!(forecast.predicted, 977);
        assert_eq!(forecast.confidence, Confidence::High);
        assert_eq!(forecast.method, ForecastMethod::Hybrid);
    }

    #[test]
    fn prediction_respects_the_swing_bound() {
        // History far above the current cutoff pulls the fused value out of
        // range; the clamp holds it at +30%.
        let history = cutoff_history(&[(2022, 1200), (2023, 1100), (2024, 1000)]);
        let forecast = predict_cutoff(100, &history, Category::Gm, 0.5);
        assert_eq!(forecast.predicted, 130);

        for boom in [0.0, 0.3, 0.5, 0.7, 0.9, 1.0] {
            for current in [100u32, 1000, 25_000] {
                let forecast = predict_cutoff(current, &history, Category::Gm, boom);
                let current = f64::from(current);
                let swing = (f64::from(forecast.predicted) - current).abs();
                assert!(swing <= current * 0.3 + 0.5, "swing {swing} at {current}");
            }
        }
    }

    #[test]
    fn volatile_history_lowers_confidence() {
        let history = cutoff_history(&[(2022, 2600), (2023, 1200), (2024, 2400)]);
        let forecast = predict_cutoff(2400, &history, Category::Gm, 0.5);
        assert_eq!(forecast.confidence, Confidence::Low);
    }

    #[test]
    fn placement_rate_extrapolates_and_clamps() {
        let rising = metric_history(&[
            (2022, Some(0.6), None),
            (2023, Some(0.7), None),
            (2024, Some(0.8), None),
        ]);
        assert!((predict_placement_rate(&rising) - 0.9).abs() < 1e-9);

        let steep = metric_history(&[
            (2022, Some(0.5), None),
            (2023, Some(0.8), None),
            (2024, Some(1.0), None),
        ]);
        assert!(predict_placement_rate(&steep) <= 1.0);
    }

    #[test]
    fn placement_rate_defaults_on_sparse_data() {
        assert_eq!(predict_placement_rate(&[]), 0.7);
        let single = metric_history(&[(2023, Some(0.85), None), (2024, None, None)]);
        assert_eq!(predict_placement_rate(&single), 0.85);
        let none = metric_history(&[(2023, None, None), (2024, None, None)]);
        assert_eq!(predict_placement_rate(&none), 0.7);
    }

    #[test]
    fn salary_extrapolates_within_bounds() {
        let rising = metric_history(&[
            (2022, None, Some(3_000_000.0)),
            (2023, None, Some(4_000_000.0)),
            (2024, None, Some(5_000_000.0)),
        ]);
        assert_eq!(predict_avg_salary(&rising), 5_000_000.0);

        let falling = metric_history(&[
            (2022, None, Some(600_000.0)),
            (2023, None, Some(400_000.0)),
            (2024, None, Some(200_000.0)),
        ]);
        assert_eq!(predict_avg_salary(&falling), 300_000.0);

        assert_eq!(predict_avg_salary(&[]), 500_000.0);
    }
}
