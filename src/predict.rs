use std::collections::BTreeMap;

use serde::Serialize;

use crate::boom::{self, BoomStatus};
use crate::category::Category;
use crate::forecast;
use crate::models::{Branch, BranchMetrics, College, CollegeType, Confidence, StudentProfile};
use crate::recommend;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPrediction {
    pub branch_name: String,
    pub current_year: i32,
    pub predicted_year: i32,
    pub current_cutoff: BTreeMap<Category, u32>,
    pub predicted_cutoff: BTreeMap<Category, u32>,
    pub boom_score: f64,
    pub boom_status: BoomStatus,
    pub adjustment_factor: f64,
    pub metrics: BranchMetrics,
    pub predicted_placement_rate: f64,
    pub predicted_avg_salary: f64,
    pub reasoning: Vec<String>,
    pub confidence: Confidence,
    pub metrics_confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub college_type: CollegeType,
    pub fees: u64,
    pub infra_rating: f64,
}

impl CollegeInfo {
    pub fn from_college(college: &College) -> CollegeInfo {
        CollegeInfo {
            id: college.id.clone(),
            name: college.name.clone(),
            location: college.location.clone(),
            college_type: college.college_type,
            fees: college.fees,
            infra_rating: college.infra_rating(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegePrediction {
    pub college: CollegeInfo,
    pub branches: Vec<BranchPrediction>,
    pub overall_boom_score: f64,
}

/// Full prediction bundle for one branch: per-category cutoff forecasts,
/// forecast metrics, boom classification and display reasoning.
pub fn predict_branch(branch: &Branch, current_year: i32) -> BranchPrediction {
    let (metrics, completeness) = BranchMetrics::from_branch(branch);
    let history = &branch.historical_data;

    let boom_score = boom::boom_score(&metrics);
    let boom_status = boom::boom_status(boom_score);

    let predicted_placement_rate = if history.len() >= 2 {
        forecast::predict_placement_rate(history)
    } else {
        metrics.placement_rate
    };
    let predicted_avg_salary = if history.len() >= 2 {
        forecast::predict_avg_salary(history)
    } else {
        metrics.avg_salary
    };

    let mut predicted_cutoff = BTreeMap::new();
    let mut confidence_total = 0.0;
    let mut confidence_count = 0usize;

    for (category, cutoff) in &branch.cutoff {
        let result = forecast::predict_cutoff(*cutoff, history, *category, boom_score);
        predicted_cutoff.insert(*category, result.predicted);
        confidence_total += result.confidence.weight();
        confidence_count += 1;
    }

    let adjustment_factor = {
        let current_mean = mean(branch.cutoff.values());
        let predicted_mean = mean(predicted_cutoff.values());
        match (current_mean, predicted_mean) {
            (Some(current), Some(predicted)) if current > 0.0 => predicted / current,
            _ => 1.0,
        }
    };

    let mut reasoning = Vec::new();
    if history.len() >= 2 {
        if let Some(first_category) = branch.cutoff.keys().next() {
            let insights = crate::trend::trend_insights(history, *first_category);
            reasoning.extend(insights.into_iter().take(2));
        }
    }
    reasoning.extend(boom::boom_reasons(&metrics));
    reasoning.truncate(3);

    let avg_confidence = if confidence_count > 0 {
        confidence_total / confidence_count as f64
    } else {
        0.0
    };

    BranchPrediction {
        branch_name: branch.name.clone(),
        current_year,
        predicted_year: current_year + 1,
        current_cutoff: branch.cutoff.clone(),
        predicted_cutoff,
        boom_score,
        boom_status,
        adjustment_factor,
        metrics,
        predicted_placement_rate,
        predicted_avg_salary,
        reasoning,
        confidence: Confidence::from_weight(avg_confidence),
        metrics_confidence: completeness.confidence(),
    }
}

fn mean<'a>(values: impl Iterator<Item = &'a u32>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += f64::from(*value);
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn predict_college(college: &College, current_year: i32) -> CollegePrediction {
    let branches: Vec<BranchPrediction> = college
        .branches
        .iter()
        .map(|branch| predict_branch(branch, current_year))
        .collect();

    let overall_boom_score = if branches.is_empty() {
        0.0
    } else {
        branches.iter().map(|b| b.boom_score).sum::<f64>() / branches.len() as f64
    };

    CollegePrediction {
        college: CollegeInfo::from_college(college),
        branches,
        overall_boom_score,
    }
}

pub fn predict_colleges(colleges: &[College], current_year: i32) -> Vec<CollegePrediction> {
    colleges
        .iter()
        .map(|college| predict_college(college, current_year))
        .collect()
}

/// Narrows college predictions to branches the student is eligible for in
/// their category. Preferred branches are advisory: they restrict the
/// result only when at least one of them is eligible.
pub fn filter_by_student(
    predictions: Vec<CollegePrediction>,
    profile: &StudentProfile,
) -> Vec<CollegePrediction> {
    let mut filtered: Vec<CollegePrediction> = predictions
        .into_iter()
        .filter_map(|mut prediction| {
            let mut eligible: Vec<BranchPrediction> = prediction
                .branches
                .into_iter()
                .filter(|branch| {
                    branch
                        .current_cutoff
                        .get(&profile.category)
                        .is_some_and(|cutoff| profile.rank <= *cutoff)
                })
                .collect();

            if !profile.preferred_branches.is_empty() {
                let preferred: Vec<BranchPrediction> = eligible
                    .iter()
                    .filter(|branch| {
                        profile
                            .preferred_branches
                            .iter()
                            .any(|pref| recommend::matches_preference(&branch.branch_name, pref))
                    })
                    .cloned()
                    .collect();
                if !preferred.is_empty() {
                    eligible = preferred;
                }
            }

            if eligible.is_empty() {
                None
            } else {
                prediction.branches = eligible;
                Some(prediction)
            }
        })
        .collect();

    filtered.sort_by(|a, b| {
        b.overall_boom_score
            .partial_cmp(&a.overall_boom_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    filtered
}
