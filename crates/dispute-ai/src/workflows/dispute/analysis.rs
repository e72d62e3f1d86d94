use serde::Serialize;

use super::domain::PriceComparison;
use super::intel::{CounterpartyProfile, VulnerabilityAssessment};
use super::leverage::{LeverageConfig, LeverageEngine, LeverageReport};
use super::prediction::{predict_outcome, Prediction};
use super::strategy::{select_strategies, StrategyPlan};

/// Composite report for one bill: price comparison, counterparty exposure,
/// ranked leverage, the strategy plan, and the forecast for its primary
/// strategy. Recomputable from the same inputs at any time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisputeAnalysis {
    pub price: PriceComparison,
    pub vulnerability: VulnerabilityAssessment,
    pub leverage: LeverageReport,
    pub plan: StrategyPlan,
    pub prediction: Prediction,
    pub recommendation: String,
}

impl DisputeAnalysis {
    pub fn build(
        billed_amount: i64,
        reference_amount: i64,
        profile: &CounterpartyProfile,
        declared_annual_income: Option<i64>,
        config: &LeverageConfig,
    ) -> Self {
        let price = PriceComparison::evaluate(billed_amount, reference_amount);
        let leverage =
            LeverageEngine::new(config.clone()).assess(&price, profile, declared_annual_income);
        let plan = select_strategies(&price, profile, &leverage, declared_annual_income);
        let prediction = predict_outcome(&plan.primary().strategy, &leverage, profile, &price);
        let recommendation = plan.recommendation();

        Self {
            price,
            vulnerability: profile.vulnerability(),
            leverage,
            plan,
            prediction,
            recommendation,
        }
    }
}
