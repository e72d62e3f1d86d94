mod catalog;

pub use catalog::{definition, EffortLevel, StrategyDefinition, StrategyKind};

use serde::Serialize;

use super::domain::{OverchargeSeverity, PriceComparison};
use super::intel::CounterpartyProfile;
use super::leverage::{LeverageReport, LeverageTier};

/// Absolute overcharge below which a forum filing is not worth the effort.
const COMPLAINT_MATERIALITY_FLOOR: i64 = 20_000;

/// One applicable strategy with its table priority and why it qualified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedStrategy {
    pub strategy: StrategyDefinition,
    pub priority: u8,
    pub reason: String,
}

/// Ranked, deduplicated strategies for one case. Never empty: standard
/// negotiation always qualifies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPlan {
    ranked: Vec<SelectedStrategy>,
}

impl StrategyPlan {
    pub fn primary(&self) -> &SelectedStrategy {
        &self.ranked[0]
    }

    /// Up to three runners-up, for display and fallback.
    pub fn alternatives(&self) -> &[SelectedStrategy] {
        let end = self.ranked.len().min(4);
        &self.ranked[1..end]
    }

    pub fn ranked(&self) -> &[SelectedStrategy] {
        &self.ranked
    }

    /// The route of last resort, regardless of whether it ranked.
    pub fn escalation_fallback(&self) -> StrategyDefinition {
        definition(StrategyKind::FormalComplaint)
    }

    pub fn recommendation(&self) -> String {
        let fallback = self
            .ranked
            .get(1)
            .map(|entry| entry.strategy.name)
            .unwrap_or_else(|| self.escalation_fallback().name);
        format!(
            "Start with {}. If unsuccessful, escalate to {}.",
            self.primary().strategy.name,
            fallback
        )
    }
}

/// Deterministic decision table, evaluated in priority order. A lookup, not
/// a planner: no search or optimization happens here.
pub fn select_strategies(
    price: &PriceComparison,
    profile: &CounterpartyProfile,
    leverage: &LeverageReport,
    declared_annual_income: Option<i64>,
) -> StrategyPlan {
    let mut ranked = Vec::new();

    if profile.charitable_trust || profile.charity_policy {
        if let (Some(income), Some(threshold)) =
            (declared_annual_income, profile.charity_income_threshold)
        {
            if income < threshold {
                ranked.push(SelectedStrategy {
                    strategy: definition(StrategyKind::CharityCare),
                    priority: 1,
                    reason: format!(
                        "Declared income ({income}) is below the charity care threshold ({threshold})"
                    ),
                });
            }
        }
    }

    if price.severity >= OverchargeSeverity::Significant {
        ranked.push(SelectedStrategy {
            strategy: definition(StrategyKind::DisputeAndNegotiate),
            priority: 2,
            reason: format!(
                "Bill is {:.0}% above the reference rate",
                price.overcharge_percentage
            ),
        });
    }

    if matches!(leverage.tier, LeverageTier::High | LeverageTier::Maximum) {
        ranked.push(SelectedStrategy {
            strategy: definition(StrategyKind::AggressiveNegotiation),
            priority: 3,
            reason: format!(
                "Counterparty has high vulnerability (leverage score {:.0})",
                leverage.total_score
            ),
        });
    }

    ranked.push(SelectedStrategy {
        strategy: definition(StrategyKind::StandardNegotiation),
        priority: 4,
        reason: "Available for all cases".to_string(),
    });

    if price.overcharge_amount > COMPLAINT_MATERIALITY_FLOOR {
        ranked.push(SelectedStrategy {
            strategy: definition(StrategyKind::FormalComplaint),
            priority: 5,
            reason: format!(
                "Overcharge of {} justifies a forum filing",
                price.overcharge_amount
            ),
        });
    }

    ranked.sort_by_key(|entry| entry.priority);

    StrategyPlan { ranked }
}
