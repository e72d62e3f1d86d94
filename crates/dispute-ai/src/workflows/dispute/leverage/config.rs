use serde::{Deserialize, Serialize};

/// Thresholds and caps backing the leverage rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageConfig {
    /// Ceiling on the aggregate score.
    pub score_ceiling: f64,
    /// Cap on the overcharge signal's contribution.
    pub overcharge_cap: f64,
    /// Overcharge percentage points per score point.
    pub overcharge_divisor: f64,
    /// Overcharge percentage above which the pricing point is rated high.
    pub severe_overcharge_pct: f64,
    /// Complaint count above which complaint volume becomes a lever.
    pub complaint_threshold: u32,
    /// Complaint count above which that lever is rated high.
    pub complaint_high_threshold: u32,
    /// Aggregate score above which the tier is at least medium.
    pub tier_medium_floor: f64,
    /// Aggregate score above which the tier is at least high.
    pub tier_high_floor: f64,
    /// Aggregate score above which the tier is maximum.
    pub tier_maximum_floor: f64,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            score_ceiling: 200.0,
            overcharge_cap: 40.0,
            overcharge_divisor: 5.0,
            severe_overcharge_pct: 200.0,
            complaint_threshold: 30,
            complaint_high_threshold: 50,
            tier_medium_floor: 60.0,
            tier_high_floor: 100.0,
            tier_maximum_floor: 150.0,
        }
    }
}
