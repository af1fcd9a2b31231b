use std::collections::BTreeMap;

use serde::Serialize;

use crate::predict::CollegePrediction;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingSummary {
    pub top_booming_branches: Vec<String>,
    pub top_declining_branches: Vec<String>,
    pub average_cutoff_change: f64,
}

/// Market-wide roll-up across all processed branch predictions: branches
/// grouped by name with boom score and adjustment factor averaged, top-5
/// booming and bottom-5 declining, plus the mean cutoff movement as a
/// percentage.
pub fn trending_summary(predictions: &[CollegePrediction]) -> TrendingSummary {
    let mut groups: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for prediction in predictions {
        for branch in &prediction.branches {
            let entry = groups.entry(branch.branch_name.as_str()).or_default();
            entry.0.push(branch.boom_score);
            entry.1.push(branch.adjustment_factor);
        }
    }

    let mut averages: Vec<(String, f64, f64)> = groups
        .into_iter()
        .map(|(name, (scores, adjustments))| {
            let avg_score = scores.iter().sum::<f64>() / scores.len() as f64;
            let avg_adjustment = adjustments.iter().sum::<f64>() / adjustments.len() as f64;
            (name.to_string(), avg_score, avg_adjustment)
        })
        .collect();

    averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let top_booming_branches: Vec<String> = averages
        .iter()
        .take(5)
        .map(|(name, _, _)| name.clone())
        .collect();

    let tail_start = averages.len().saturating_sub(5);
    let top_declining_branches: Vec<String> = averages[tail_start..]
        .iter()
        .rev()
        .map(|(name, _, _)| name.clone())
        .collect();

    let average_cutoff_change = if averages.is_empty() {
        0.0
    } else {
        let mean_adjustment =
            averages.iter().map(|(_, _, adj)| adj).sum::<f64>() / averages.len() as f64;
        (mean_adjustment - 1.0) * 100.0
    };

    TrendingSummary {
        top_booming_branches,
        top_declining_branches,
        average_cutoff_change,
    }
}
