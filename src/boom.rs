//! Composite branch desirability ("boom") scoring from placement, salary,
//! industry and admission signals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::BranchMetrics;
use crate::policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoomStatus {
    Booming,
    Stable,
    Declining,
}

impl fmt::Display for BoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BoomStatus::Booming => "booming",
            BoomStatus::Stable => "stable",
            BoomStatus::Declining => "declining",
        };
        f.write_str(label)
    }
}

fn normalized_salary_growth(avg_salary: f64) -> f64 {
    ((avg_salary - policy::SALARY_BASELINE) / policy::SALARY_BASELINE).clamp(0.0, 1.0)
}

/// Weighted boom score in [0, 1].
pub fn boom_score(metrics: &BranchMetrics) -> f64 {
    let score = metrics.placement_rate * policy::PLACEMENT_WEIGHT
        + normalized_salary_growth(metrics.avg_salary) * policy::SALARY_GROWTH_WEIGHT
        + metrics.industry_growth * policy::INDUSTRY_GROWTH_WEIGHT
        + metrics.admission_trend * policy::ADMISSION_TREND_WEIGHT;
    score.clamp(0.0, 1.0)
}

pub fn boom_status(score: f64) -> BoomStatus {
    if score >= policy::BOOMING_THRESHOLD {
        BoomStatus::Booming
    } else if score >= policy::STABLE_THRESHOLD {
        BoomStatus::Stable
    } else {
        BoomStatus::Declining
    }
}

/// Multiplicative cutoff factor for a boom score: booming branches get
/// 15-25% tighter cutoffs, stable 5-10% tighter, declining 5-10% looser.
pub fn cutoff_adjustment(score: f64) -> f64 {
    match boom_status(score) {
        BoomStatus::Booming => {
            1.0 - (policy::BOOMING_BASE_DROP
                + (score - policy::BOOMING_THRESHOLD) * policy::BOOMING_DROP_SLOPE)
        }
        BoomStatus::Stable => {
            1.0 - (policy::STABLE_BASE_DROP
                + (score - policy::STABLE_THRESHOLD) * policy::STABLE_DROP_SLOPE)
        }
        BoomStatus::Declining => {
            1.0 + (policy::DECLINING_BASE_RISE
                + (policy::STABLE_THRESHOLD - score) * policy::DECLINING_RISE_SLOPE)
        }
    }
}

/// Boom desirability capped at 0.8, used by the eligibility ranker when
/// tightening cutoffs. Kept as a separate function from `boom_score`; the
/// two variants are not interchangeable.
pub fn eligibility_boom_flag(metrics: &BranchMetrics) -> f64 {
    boom_score(metrics).min(policy::BOOM_FLAG_CEILING)
}

/// Signal-level reasons ranked by weighted contribution, top three.
pub fn boom_reasons(metrics: &BranchMetrics) -> Vec<String> {
    let mut reasons: Vec<(String, f64)> = Vec::new();

    if metrics.placement_rate >= 0.8 {
        reasons.push((
            format!(
                "High placement rate of {:.0}%",
                metrics.placement_rate * 100.0
            ),
            metrics.placement_rate * policy::PLACEMENT_WEIGHT,
        ));
    } else if metrics.placement_rate < 0.5 {
        reasons.push((
            format!(
                "Low placement rate of {:.0}%",
                metrics.placement_rate * 100.0
            ),
            metrics.placement_rate * policy::PLACEMENT_WEIGHT,
        ));
    }

    let salary_in_lakhs = metrics.avg_salary / 100_000.0;
    if metrics.avg_salary >= 700_000.0 {
        reasons.push((
            format!("Strong average salary of ₹{:.1} LPA", salary_in_lakhs),
            policy::SALARY_GROWTH_WEIGHT,
        ));
    } else if metrics.avg_salary < 400_000.0 {
        reasons.push((
            format!("Below-average salary of ₹{:.1} LPA", salary_in_lakhs),
            policy::SALARY_GROWTH_WEIGHT,
        ));
    }

    if metrics.industry_growth >= 0.7 {
        reasons.push((
            format!(
                "High industry demand ({:.0}% growth indicator)",
                metrics.industry_growth * 100.0
            ),
            metrics.industry_growth * policy::INDUSTRY_GROWTH_WEIGHT,
        ));
    } else if metrics.industry_growth < 0.4 {
        reasons.push((
            format!(
                "Declining industry demand ({:.0}% growth indicator)",
                metrics.industry_growth * 100.0
            ),
            metrics.industry_growth * policy::INDUSTRY_GROWTH_WEIGHT,
        ));
    }

    if metrics.admission_trend >= 0.7 {
        reasons.push((
            format!(
                "Strong student preference ({:.0}% admission trend)",
                metrics.admission_trend * 100.0
            ),
            metrics.admission_trend * policy::ADMISSION_TREND_WEIGHT,
        ));
    }

    reasons.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    reasons.into_iter().take(3).map(|(text, _)| text).collect()
}
