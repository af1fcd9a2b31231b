//! Externally-facing predictions payload: per-category cutoff forecasts
//! for the current and next admission year across the whole catalog, with
//! percentage confidence and per-student admission chances.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::models::{College, StudentProfile};
use crate::policy;
use crate::recommend;
use crate::summary::TrendingSummary;
use crate::trend::TrendDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionChance {
    High,
    Medium,
    Low,
}

impl AdmissionChance {
    fn order(self) -> u8 {
        match self {
            AdmissionChance::High => 0,
            AdmissionChance::Medium => 1,
            AdmissionChance::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCutoff {
    pub year: i32,
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPrediction {
    pub college: String,
    pub college_code: String,
    pub branch: String,
    pub category: Category,
    pub predicted_cutoff_2025: u32,
    pub predicted_cutoff_2026: u32,
    /// Percentage form consumed by dashboards; the three-level labels used
    /// inside the engine are a separate scale.
    pub confidence: u8,
    pub trend: TrendDirection,
    pub historical_data: Vec<YearCutoff>,
    pub change_percentage: f64,
    pub admission_chance: AdmissionChance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalStats {
    pub total_colleges: usize,
    pub total_branches: usize,
    pub years_covered: Vec<i32>,
    pub avg_cutoff_by_year: BTreeMap<i32, u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub data_years: Vec<i32>,
    pub prediction_years: [i32; 2],
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsPayload {
    pub current_year: i32,
    pub predicted_year: i32,
    pub student_profile: Option<StudentProfile>,
    pub total_colleges: usize,
    pub predictions: Vec<EnhancedPrediction>,
    pub trending_summary: TrendingSummary,
    pub historical_stats: HistoricalStats,
    pub metadata: PayloadMetadata,
}

fn category_series(
    history: &[crate::models::HistoricalDataPoint],
    category: Category,
) -> Vec<YearCutoff> {
    let mut series: Vec<YearCutoff> = history
        .iter()
        .filter_map(|point| {
            point.cutoff.get(&category).map(|rank| YearCutoff {
                year: point.year,
                rank: *rank,
            })
        })
        .collect();
    series.sort_by_key(|entry| entry.year);
    series
}

/// Cutoff forecast for a target year from a calendar-year series. A single
/// observation is carried forward unchanged; longer series use a linear
/// fit against the year axis, clamped to the observable rank range.
fn predict_rank_for_year(series: &[YearCutoff], target_year: i32) -> Option<u32> {
    match series {
        [] => None,
        [only] => Some(only.rank),
        _ => {
            let n = series.len() as f64;
            let sum_x: f64 = series.iter().map(|e| f64::from(e.year)).sum();
            let sum_y: f64 = series.iter().map(|e| f64::from(e.rank)).sum();
            let sum_xy: f64 = series
                .iter()
                .map(|e| f64::from(e.year) * f64::from(e.rank))
                .sum();
            let sum_x2: f64 = series
                .iter()
                .map(|e| f64::from(e.year) * f64::from(e.year))
                .sum();

            let denominator = n * sum_x2 - sum_x * sum_x;
            if denominator == 0.0 {
                return series.last().map(|e| e.rank);
            }
            let slope = (n * sum_xy - sum_x * sum_y) / denominator;
            let intercept = (sum_y - slope * sum_x) / n;
            let predicted = slope * f64::from(target_year) + intercept;
            let bounded = predicted
                .round()
                .clamp(
                    f64::from(policy::MIN_FORECAST_RANK),
                    f64::from(policy::MAX_FORECAST_RANK),
                );
            Some(bounded as u32)
        }
    }
}

fn trend_label(series: &[YearCutoff]) -> TrendDirection {
    if series.len() < 2 {
        return TrendDirection::Stable;
    }
    let first = f64::from(series[0].rank);
    let last = f64::from(series[series.len() - 1].rank);
    let change = (last - first) / first * 100.0;
    if change > 5.0 {
        TrendDirection::Increasing
    } else if change < -5.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// 0-100 confidence from series length and spread: sparse series get fixed
/// tiers, longer ones score by coefficient of variation plus a data bonus.
fn confidence_percent(series: &[YearCutoff]) -> u8 {
    match series.len() {
        0 => 0,
        1 => 50,
        2 => 70,
        n => {
            let count = n as f64;
            let mean = series.iter().map(|e| f64::from(e.rank)).sum::<f64>() / count;
            let variance = series
                .iter()
                .map(|e| (f64::from(e.rank) - mean) * (f64::from(e.rank) - mean))
                .sum::<f64>()
                / count;
            let coefficient_of_variation = variance.sqrt() / mean;
            let confidence = (100.0 - coefficient_of_variation * 100.0).clamp(0.0, 100.0);
            let data_bonus = (count * 5.0).min(20.0);
            (confidence + data_bonus).min(100.0).round() as u8
        }
    }
}

pub fn admission_chance(student_rank: u32, cutoff_rank: u32) -> AdmissionChance {
    if cutoff_rank == 0 {
        return AdmissionChance::Low;
    }
    let difference = f64::from(cutoff_rank) - f64::from(student_rank);
    let percent_diff = difference / f64::from(cutoff_rank) * 100.0;
    if percent_diff > policy::HIGH_CHANCE_MARGIN_PERCENT {
        AdmissionChance::High
    } else if percent_diff > 0.0 {
        AdmissionChance::Medium
    } else {
        AdmissionChance::Low
    }
}

/// One prediction row per (college, branch, category) with usable history;
/// pairs without any observed cutoff are omitted entirely.
pub fn enhanced_predictions(colleges: &[College], current_year: i32) -> Vec<EnhancedPrediction> {
    let mut predictions = Vec::new();

    for college in colleges {
        for branch in &college.branches {
            for category in Category::ALL {
                let series = category_series(&branch.historical_data, category);
                let Some(predicted_current) = predict_rank_for_year(&series, current_year) else {
                    continue;
                };
                let Some(predicted_next) = predict_rank_for_year(&series, current_year + 1)
                else {
                    continue;
                };

                let latest_rank = series.last().map(|e| e.rank).unwrap_or(predicted_current);
                let change_percentage = (f64::from(predicted_next) - f64::from(latest_rank))
                    / f64::from(latest_rank)
                    * 100.0;

                predictions.push(EnhancedPrediction {
                    college: college.name.clone(),
                    college_code: college.id.clone(),
                    branch: branch.name.clone(),
                    category,
                    predicted_cutoff_2025: predicted_current,
                    predicted_cutoff_2026: predicted_next,
                    confidence: confidence_percent(&series),
                    trend: trend_label(&series),
                    historical_data: series,
                    change_percentage: (change_percentage * 10.0).round() / 10.0,
                    admission_chance: AdmissionChance::Medium,
                });
            }
        }
    }

    predictions
}

fn change_based_summary(predictions: &[EnhancedPrediction]) -> TrendingSummary {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for prediction in predictions {
        groups
            .entry(prediction.branch.as_str())
            .or_default()
            .push(prediction.change_percentage);
    }

    let mut branch_changes: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(branch, changes)| {
            let avg = changes.iter().sum::<f64>() / changes.len() as f64;
            (branch.to_string(), avg)
        })
        .collect();
    branch_changes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let top_booming_branches: Vec<String> = branch_changes
        .iter()
        .filter(|(_, change)| *change > 0.0)
        .take(5)
        .map(|(branch, _)| branch.clone())
        .collect();

    let declining: Vec<&(String, f64)> = branch_changes
        .iter()
        .filter(|(_, change)| *change < 0.0)
        .collect();
    let tail_start = declining.len().saturating_sub(5);
    let top_declining_branches: Vec<String> = declining[tail_start..]
        .iter()
        .rev()
        .map(|(branch, _)| branch.clone())
        .collect();

    let average_cutoff_change = if predictions.is_empty() {
        0.0
    } else {
        predictions
            .iter()
            .map(|p| p.change_percentage)
            .sum::<f64>()
            / predictions.len() as f64
    };

    TrendingSummary {
        top_booming_branches,
        top_declining_branches,
        average_cutoff_change,
    }
}

fn historical_stats(predictions: &[EnhancedPrediction]) -> HistoricalStats {
    let colleges: BTreeSet<&str> = predictions.iter().map(|p| p.college.as_str()).collect();
    let branches: BTreeSet<&str> = predictions.iter().map(|p| p.branch.as_str()).collect();

    let mut year_ranks: BTreeMap<i32, Vec<u32>> = BTreeMap::new();
    for prediction in predictions {
        for entry in &prediction.historical_data {
            year_ranks.entry(entry.year).or_default().push(entry.rank);
        }
    }

    let avg_cutoff_by_year: BTreeMap<i32, u32> = year_ranks
        .iter()
        .map(|(year, ranks)| {
            let avg = ranks.iter().map(|r| f64::from(*r)).sum::<f64>() / ranks.len() as f64;
            (*year, avg.round() as u32)
        })
        .collect();

    HistoricalStats {
        total_colleges: colleges.len(),
        total_branches: branches.len(),
        years_covered: year_ranks.keys().copied().collect(),
        avg_cutoff_by_year,
    }
}

/// Assembles the full predictions payload. When a student profile is
/// supplied, rows are filtered by preferred branches, given per-student
/// admission chances against the next-year cutoff, and ordered by chance
/// then predicted cutoff. `last_updated` comes from the caller so the
/// engine itself stays deterministic.
pub fn build_predictions_payload(
    colleges: &[College],
    profile: Option<&StudentProfile>,
    current_year: i32,
    last_updated: DateTime<Utc>,
) -> PredictionsPayload {
    let mut predictions = enhanced_predictions(colleges, current_year);

    if let Some(student) = profile {
        if !student.preferred_branches.is_empty() {
            predictions.retain(|prediction| {
                student
                    .preferred_branches
                    .iter()
                    .any(|pref| recommend::matches_preference(&prediction.branch, pref))
            });
        }

        for prediction in &mut predictions {
            prediction.admission_chance =
                admission_chance(student.rank, prediction.predicted_cutoff_2026);
        }

        predictions.sort_by(|a, b| {
            a.admission_chance
                .order()
                .cmp(&b.admission_chance.order())
                .then(a.predicted_cutoff_2026.cmp(&b.predicted_cutoff_2026))
        });
    }

    let trending_summary = change_based_summary(&predictions);
    let historical_stats = historical_stats(&predictions);
    let data_years = historical_stats.years_covered.clone();

    PredictionsPayload {
        current_year,
        predicted_year: current_year + 1,
        student_profile: profile.cloned(),
        total_colleges: predictions.len(),
        predictions,
        trending_summary,
        historical_stats,
        metadata: PayloadMetadata {
            data_years,
            prediction_years: [current_year, current_year + 1],
            last_updated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, CollegeType, HistoricalDataPoint};
    use chrono::TimeZone;
    use std::collections::BTreeMap as Map;

    fn series(points: &[(i32, u32)]) -> Vec<YearCutoff> {
        points
            .iter()
            .map(|(year, rank)| YearCutoff {
                year: *year,
                rank: *rank,
            })
            .collect()
    }

    fn college_with_history(ranks: &[(i32, u32)]) -> College {
        let historical_data = ranks
            .iter()
            .map(|(year, rank)| HistoricalDataPoint {
                year: *year,
                cutoff: Map::from([(Category::Gm, *rank)]),
                placement_rate: None,
                avg_salary: None,
                students_admitted: None,
                students_placed: None,
            })
            .collect();
        College {
            id: "E001".to_string(),
            name: "UVCE".to_string(),
            location: "Bengaluru".to_string(),
            college_type: CollegeType::Government,
            fees: 50_000,
            infra_rating: None,
            branches: vec![Branch {
                name: "Computer Science and Engineering".to_string(),
                cutoff: Map::from([(Category::Gm, 1000)]),
                placement_rate: None,
                avg_salary: None,
                max_salary: None,
                admission_trend: None,
                industry_growth: None,
                historical_data,
            }],
        }
    }

    #[test]
    fn year_regression_extrapolates_linearly() {
        let s = series(&[(2022, 1200), (2023, 1100), (2024, 1000)]);
        assert_eq!(predict_rank_for_year(&s, 2025), Some(900));
        assert_eq!(predict_rank_for_year(&s, 2026), Some(800));
    }

    #[test]
    fn sparse_series_carry_forward_or_skip() {
        assert_eq!(predict_rank_for_year(&[], 2025), None);
        let single = series(&[(2024, 1500)]);
        assert_eq!(predict_rank_for_year(&single, 2026), Some(1500));
    }

    #[test]
    fn predictions_never_leave_rank_bounds() {
        let collapsing = series(&[(2022, 900), (2023, 500), (2024, 100)]);
        assert_eq!(predict_rank_for_year(&collapsing, 2026), Some(1));
    }

    #[test]
    fn trend_label_uses_percent_change_bands() {
        assert_eq!(trend_label(&series(&[(2022, 1000), (2024, 1200)])), TrendDirection::Increasing);
        assert_eq!(trend_label(&series(&[(2022, 1200), (2024, 1000)])), TrendDirection::Decreasing);
        assert_eq!(trend_label(&series(&[(2022, 1000), (2024, 1030)])), TrendDirection::Stable);
        assert_eq!(trend_label(&series(&[(2024, 1000)])), TrendDirection::Stable);
    }

    #[test]
    fn confidence_tiers_with_data_volume() {
        assert_eq!(confidence_percent(&[]), 0);
        assert_eq!(confidence_percent(&series(&[(2024, 1000)])), 50);
        assert_eq!(confidence_percent(&series(&[(2023, 1000), (2024, 1100)])), 70);
        // Tight three-year series saturates at 100 with the data bonus.
        assert_eq!(
            confidence_percent(&series(&[(2022, 1200), (2023, 1100), (2024, 1000)])),
            100
        );
    }

    #[test]
    fn chance_bands_follow_cutoff_margin() {
        assert_eq!(admission_chance(700, 1000), AdmissionChance::High);
        assert_eq!(admission_chance(950, 1000), AdmissionChance::Medium);
        assert_eq!(admission_chance(1200, 1000), AdmissionChance::Low);
    }

    #[test]
    fn payload_skips_branches_without_history() {
        let mut college = college_with_history(&[]);
        college.branches[0].historical_data.clear();
        let rows = enhanced_predictions(&[college], 2025);
        assert!(rows.is_empty());
    }

    #[test]
    fn payload_carries_prediction_rows_and_stats() {
        let college = college_with_history(&[(2022, 1200), (2023, 1100), (2024, 1000)]);
        let stamp = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let payload = build_predictions_payload(&[college], None, 2025, stamp);

        assert_eq!(payload.current_year, 2025);
        assert_eq!(payload.predicted_year, 2026);
        assert_eq!(payload.predictions.len(), 1);
        let row = &payload.predictions[0];
        assert_eq!(row.predicted_cutoff_2025, 900);
        assert_eq!(row.predicted_cutoff_2026, 800);
        assert_eq!(row.change_percentage, -20.0);
        assert_eq!(row.trend, TrendDirection::Decreasing);
        assert_eq!(row.admission_chance, AdmissionChance::Medium);

        assert_eq!(payload.historical_stats.total_colleges, 1);
        assert_eq!(payload.historical_stats.years_covered, vec![2022, 2023, 2024]);
        assert_eq!(payload.historical_stats.avg_cutoff_by_year[&2023], 1100);
        assert_eq!(payload.metadata.prediction_years, [2025, 2026]);
        // Falling cutoffs mean the branch reads as declining in the
        // change-based market summary.
        assert_eq!(
            payload.trending_summary.top_declining_branches,
            vec!["Computer Science and Engineering".to_string()]
        );
    }

    #[test]
    fn student_profile_orders_rows_by_chance() {
        let reach = college_with_history(&[(2022, 700), (2023, 650), (2024, 600)]);
        let mut safe = college_with_history(&[(2022, 5200), (2023, 5100), (2024, 5000)]);
        safe.id = "E002".to_string();
        safe.name = "BMSCE".to_string();

        let profile = StudentProfile::new(900, Category::Gm, Vec::new()).unwrap();
        let stamp = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let payload =
            build_predictions_payload(&[reach, safe], Some(&profile), 2025, stamp);

        assert_eq!(payload.predictions.len(), 2);
        assert_eq!(payload.predictions[0].college, "BMSCE");
        assert_eq!(payload.predictions[0].admission_chance, AdmissionChance::High);
        assert_eq!(payload.predictions[1].admission_chance, AdmissionChance::Low);
        assert_eq!(
            payload.student_profile.as_ref().map(|p| p.rank),
            Some(900)
        );
    }
}
