use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::EngineError;
use crate::policy;

/// One year's observed outcome for a branch. Produced by the ingestion
/// layer and never mutated here; categories missing from the cutoff table
/// are absent from the map, never recorded as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataPoint {
    pub year: i32,
    #[serde(default)]
    pub cutoff: BTreeMap<Category, u32>,
    #[serde(default)]
    pub placement_rate: Option<f64>,
    #[serde(default)]
    pub avg_salary: Option<f64>,
    #[serde(default)]
    pub students_admitted: Option<u32>,
    #[serde(default)]
    pub students_placed: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    pub cutoff: BTreeMap<Category, u32>,
    #[serde(default)]
    pub placement_rate: Option<f64>,
    #[serde(default)]
    pub avg_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub admission_trend: Option<f64>,
    #[serde(default)]
    pub industry_growth: Option<f64>,
    #[serde(default)]
    pub historical_data: Vec<HistoricalDataPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollegeType {
    Government,
    #[default]
    Private,
    Autonomous,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub college_type: CollegeType,
    pub fees: u64,
    #[serde(default)]
    pub infra_rating: Option<f64>,
    #[serde(rename = "branchesOffered")]
    pub branches: Vec<Branch>,
}

impl College {
    pub fn infra_rating(&self) -> f64 {
        self.infra_rating.unwrap_or(policy::DEFAULT_INFRA_RATING)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub rank: u32,
    pub category: Category,
    #[serde(default)]
    pub preferred_branches: Vec<String>,
}

impl StudentProfile {
    pub fn new(
        rank: u32,
        category: Category,
        preferred_branches: Vec<String>,
    ) -> Result<Self, EngineError> {
        if rank == 0 {
            return Err(EngineError::InvalidRank(rank));
        }
        Ok(StudentProfile {
            rank,
            category,
            preferred_branches,
        })
    }
}

/// Current-year signal snapshot for a branch, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchMetrics {
    pub placement_rate: f64,
    pub avg_salary: f64,
    pub max_salary: f64,
    pub admission_trend: f64,
    pub industry_growth: f64,
}

/// Records which of the defaultable signals were actually observed, as
/// opposed to filled from defaults. Downstream confidence reads these
/// flags instead of comparing values against the default constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsCompleteness {
    pub placement_rate: bool,
    pub avg_salary: bool,
    pub admission_trend: bool,
    pub industry_growth: bool,
}

impl MetricsCompleteness {
    pub fn observed_count(&self) -> usize {
        [
            self.placement_rate,
            self.avg_salary,
            self.admission_trend,
            self.industry_growth,
        ]
        .iter()
        .filter(|flag| **flag)
        .count()
    }

    pub fn confidence(&self) -> Confidence {
        match self.observed_count() {
            3.. => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl BranchMetrics {
    /// Resolves a branch record into a complete metric snapshot plus the
    /// flags saying which values were observed rather than defaulted.
    pub fn from_branch(branch: &Branch) -> (BranchMetrics, MetricsCompleteness) {
        let metrics = BranchMetrics {
            placement_rate: branch
                .placement_rate
                .unwrap_or(policy::DEFAULT_PLACEMENT_RATE),
            avg_salary: branch.avg_salary.unwrap_or(policy::DEFAULT_AVG_SALARY),
            max_salary: branch.max_salary.unwrap_or(policy::DEFAULT_MAX_SALARY),
            admission_trend: branch
                .admission_trend
                .unwrap_or(policy::DEFAULT_ADMISSION_TREND),
            industry_growth: branch
                .industry_growth
                .unwrap_or(policy::DEFAULT_INDUSTRY_GROWTH),
        };
        let completeness = MetricsCompleteness {
            placement_rate: branch.placement_rate.is_some(),
            avg_salary: branch.avg_salary.is_some(),
            admission_trend: branch.admission_trend.is_some(),
            industry_growth: branch.industry_growth.is_some(),
        };
        (metrics, completeness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(label)
    }
}

impl Confidence {
    pub fn weight(self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.6,
            Confidence::Low => 0.3,
        }
    }

    /// Inverse of `weight` for aggregated confidence values.
    pub fn from_weight(avg: f64) -> Confidence {
        if avg >= 0.7 {
            Confidence::High
        } else if avg < 0.4 {
            Confidence::Low
        } else {
            Confidence::Medium
        }
    }
}
