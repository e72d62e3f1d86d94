use serde::Serialize;

use super::domain::PriceComparison;
use super::intel::{CounterpartyProfile, VulnerabilityLevel};
use super::leverage::{LeverageReport, LeverageTier};
use super::strategy::StrategyDefinition;

const SUCCESS_CEILING: f64 = 95.0;
const DISCOUNT_CEILING: f64 = 90.0;
/// Half-width of the final-amount range, in discount points.
const RANGE_SPREAD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionConfidence {
    Low,
    Medium,
    High,
}

impl PredictionConfidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            Self::High => "Strong leverage and counterparty vulnerability make success likely",
            Self::Medium => "Reasonable chance of success with proper negotiation",
            Self::Low => "May require escalation to the consumer forum for resolution",
        }
    }
}

/// Every contribution to the forecast, for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionBreakdown {
    pub base_success_rate: f64,
    pub leverage_success_modifier: f64,
    pub vulnerability_success_modifier: f64,
    pub base_discount: f64,
    pub leverage_discount_modifier: f64,
    pub vulnerability_discount_modifier: f64,
    pub settlement_history_adjustment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountForecast {
    pub percentage: f64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountRange {
    pub low: i64,
    pub mid: i64,
    pub high: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsForecast {
    pub minimum: i64,
    pub expected: i64,
    pub maximum: i64,
}

/// Ephemeral forecast for one (case, strategy) pair. Recomputed on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub success_probability: f64,
    pub confidence: PredictionConfidence,
    pub expected_discount: DiscountForecast,
    pub expected_final_amount: AmountRange,
    pub savings_estimate: SavingsForecast,
    pub time_estimate: &'static str,
    pub breakdown: PredictionBreakdown,
}

/// Deterministic forecast: the strategy's historical statistics shifted by
/// leverage tier, counterparty vulnerability, and the counterparty's own
/// settlement history, clamped to fixed ceilings.
pub fn predict_outcome(
    strategy: &StrategyDefinition,
    leverage: &LeverageReport,
    profile: &CounterpartyProfile,
    price: &PriceComparison,
) -> Prediction {
    let (leverage_success, leverage_discount) = match leverage.tier {
        LeverageTier::Maximum => (15.0, 20.0),
        LeverageTier::High => (10.0, 15.0),
        LeverageTier::Medium => (5.0, 10.0),
        LeverageTier::Low => (0.0, 0.0),
    };

    let (vulnerability_success, vulnerability_discount) = match profile.vulnerability().level {
        VulnerabilityLevel::High => (10.0, 10.0),
        VulnerabilityLevel::Medium => (5.0, 5.0),
        VulnerabilityLevel::Low => (0.0, 0.0),
    };

    // Nudge the discount toward what this counterparty has historically conceded.
    let settlement_adjustment = (profile.average_settlement_discount - 30.0) / 2.0;

    let success_probability = (strategy.success_rate + leverage_success + vulnerability_success)
        .clamp(0.0, SUCCESS_CEILING)
        .round();
    let discount = (strategy.typical_discount
        + leverage_discount
        + vulnerability_discount
        + settlement_adjustment)
        .clamp(0.0, DISCOUNT_CEILING)
        .round();

    let billed = price.billed_amount as f64;
    let reference = price.reference_amount as f64;
    let discount_amount = billed * discount / 100.0;

    let final_low = billed * (1.0 - (discount + RANGE_SPREAD) / 100.0);
    let final_high = billed * (1.0 - (discount - RANGE_SPREAD) / 100.0);
    let final_mid = billed * (1.0 - discount / 100.0);

    // Never forecast below 90% of the raw reference rate; flooring the mid at
    // the reference can overtake the raw high bound, so re-order afterwards.
    let low = final_low.max(reference * 0.9).round() as i64;
    let mid = final_mid.max(reference).round() as i64;
    let high = (final_high.round() as i64).max(mid);

    let confidence = if success_probability > 80.0 && leverage.total_score > 100.0 {
        PredictionConfidence::High
    } else if success_probability > 60.0 {
        PredictionConfidence::Medium
    } else {
        PredictionConfidence::Low
    };

    Prediction {
        success_probability,
        confidence,
        expected_discount: DiscountForecast {
            percentage: discount,
            amount: discount_amount.round() as i64,
        },
        expected_final_amount: AmountRange { low, mid, high },
        savings_estimate: SavingsForecast {
            minimum: price.billed_amount - high,
            expected: discount_amount.round() as i64,
            maximum: price.billed_amount - low,
        },
        time_estimate: strategy.time_to_resolution,
        breakdown: PredictionBreakdown {
            base_success_rate: strategy.success_rate,
            leverage_success_modifier: leverage_success,
            vulnerability_success_modifier: vulnerability_success,
            base_discount: strategy.typical_discount,
            leverage_discount_modifier: leverage_discount,
            vulnerability_discount_modifier: vulnerability_discount,
            settlement_history_adjustment: settlement_adjustment,
        },
    }
}
