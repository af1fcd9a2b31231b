//! Tunable policy constants for the scoring and prediction formulas.
//! These are designed weights, not fitted parameters; change them here
//! rather than inside the component control flow.

// Defaults applied when a branch record carries no observed value.
pub const DEFAULT_PLACEMENT_RATE: f64 = 0.7;
pub const DEFAULT_AVG_SALARY: f64 = 500_000.0;
pub const DEFAULT_MAX_SALARY: f64 = 2_000_000.0;
pub const DEFAULT_ADMISSION_TREND: f64 = 0.5;
pub const DEFAULT_INDUSTRY_GROWTH: f64 = 0.6;
pub const DEFAULT_INFRA_RATING: f64 = 3.0;

// Boom score: weighted fusion of the four branch signals.
pub const SALARY_BASELINE: f64 = 500_000.0;
pub const PLACEMENT_WEIGHT: f64 = 0.30;
pub const SALARY_GROWTH_WEIGHT: f64 = 0.30;
pub const INDUSTRY_GROWTH_WEIGHT: f64 = 0.25;
pub const ADMISSION_TREND_WEIGHT: f64 = 0.15;

// Boom status band edges.
pub const BOOMING_THRESHOLD: f64 = 0.8;
pub const STABLE_THRESHOLD: f64 = 0.6;

// Cutoff adjustment bands: booming branches tighten 15-25%, stable 5-10%,
// declining branches loosen 5-10%.
pub const BOOMING_BASE_DROP: f64 = 0.15;
pub const BOOMING_DROP_SLOPE: f64 = 0.5;
pub const STABLE_BASE_DROP: f64 = 0.05;
pub const STABLE_DROP_SLOPE: f64 = 0.25;
pub const DECLINING_BASE_RISE: f64 = 0.05;
pub const DECLINING_RISE_SLOPE: f64 = 0.0833;

// Eligibility ranking: the capped boom flag and how hard it tightens the
// effective cutoff before eligibility is tested.
pub const BOOM_FLAG_CEILING: f64 = 0.8;
pub const BOOM_CUTOFF_TIGHTENING: f64 = 0.3;

// Trend analysis.
pub const TREND_SIGNIFICANCE_SLOPE: f64 = 10.0;
pub const MOVING_AVERAGE_WINDOW: usize = 3;

// Cutoff forecast fusion weights. The trend weight scales with regression
// confidence up to the cap; the three weights are re-normalized to sum to 1.
pub const TREND_WEIGHT_CAP: f64 = 0.5;
pub const MOVING_AVERAGE_WEIGHT: f64 = 0.3;
pub const BOOM_WEIGHT: f64 = 0.2;

// How far the moving-average estimate is pulled toward the current cutoff.
pub const MOVING_AVERAGE_CURRENT_BLEND: f64 = 0.5;

// Confidence label thresholds for cutoff forecasts.
pub const HIGH_CONFIDENCE_R2: f64 = 0.7;
pub const LOW_CONFIDENCE_R2: f64 = 0.4;
pub const LOW_VOLATILITY: f64 = 100.0;
pub const HIGH_VOLATILITY: f64 = 200.0;

// Below this spread a series reads as a consistent trend in insights.
pub const QUIET_VOLATILITY: f64 = 50.0;

// A forecast never moves more than this fraction away from the current
// cutoff, applied after fusion.
pub const MAX_CUTOFF_SWING: f64 = 0.3;

// Metric forecast bounds.
pub const MIN_FORECAST_SALARY: f64 = 300_000.0;
pub const MAX_FORECAST_SALARY: f64 = 5_000_000.0;

// Year-based cutoff forecasts stay within the observable rank range.
pub const MIN_FORECAST_RANK: u32 = 1;
pub const MAX_FORECAST_RANK: u32 = 300_000;

// Admission chance margin: predicted cutoff must clear the student rank by
// this percentage for a "high" chance.
pub const HIGH_CHANCE_MARGIN_PERCENT: f64 = 20.0;
