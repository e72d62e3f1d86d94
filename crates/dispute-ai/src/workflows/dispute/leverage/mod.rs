mod config;
mod rules;

pub use config::LeverageConfig;

use serde::{Deserialize, Serialize};

use super::domain::PriceComparison;
use super::intel::CounterpartyProfile;

/// Stateless scorer applying the leverage rubric to one bill and profile.
pub struct LeverageEngine {
    config: LeverageConfig,
}

impl LeverageEngine {
    pub fn new(config: LeverageConfig) -> Self {
        Self { config }
    }

    pub fn assess(
        &self,
        price: &PriceComparison,
        profile: &CounterpartyProfile,
        declared_annual_income: Option<i64>,
    ) -> LeverageReport {
        let mut points = rules::collect_points(price, profile, declared_annual_income, &self.config);
        points.sort_by(|a, b| b.score.total_cmp(&a.score));

        let raw_total: f64 = points.iter().map(|point| point.score).sum();
        let total_score = raw_total.min(self.config.score_ceiling);

        let tier = if total_score > self.config.tier_maximum_floor {
            LeverageTier::Maximum
        } else if total_score > self.config.tier_high_floor {
            LeverageTier::High
        } else if total_score > self.config.tier_medium_floor {
            LeverageTier::Medium
        } else {
            LeverageTier::Low
        };

        LeverageReport {
            total_score,
            tier,
            summary: tier.summary(),
            points,
        }
    }
}

/// The discrete pressure categories the rubric recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageCategory {
    OverchargePricing,
    RateProgramEmpanelment,
    CharitableObligation,
    CharityCareEligibility,
    SetAsideQuota,
    AccreditationStandards,
    ComplaintVolume,
    RegulatoryViolations,
    ConsumerProtection,
    ItemizedBillingRight,
    InsuranceOversight,
    ReputationRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageSeverity {
    Low,
    Medium,
    High,
}

/// One identified pressure point, with the narrative a downstream script
/// generator or UI needs to present it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeveragePoint {
    pub category: LeverageCategory,
    pub severity: LeverageSeverity,
    pub score: f64,
    pub title: String,
    pub detail: String,
    pub evidence: String,
    pub recommended_action: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageTier {
    Low,
    Medium,
    High,
    Maximum,
}

impl LeverageTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Maximum => "maximum",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Maximum => {
                "You have exceptional leverage. This counterparty has multiple vulnerabilities."
            }
            Self::High => "You have strong leverage. Multiple pressure points available.",
            Self::Medium => "You have moderate leverage. Focus on your strongest points.",
            Self::Low => {
                "Limited leverage identified. The consumer forum remains your strongest option."
            }
        }
    }
}

/// Ranked leverage points plus the capped aggregate and its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeverageReport {
    pub total_score: f64,
    pub tier: LeverageTier,
    pub summary: &'static str,
    pub points: Vec<LeveragePoint>,
}

impl LeverageReport {
    /// Highest-scoring excerpt for compact downstream displays.
    pub fn top_three(&self) -> &[LeveragePoint] {
        &self.points[..self.points.len().min(3)]
    }
}
