use super::super::domain::{OverchargeSeverity, PriceComparison};
use super::super::leverage::{LeverageConfig, LeverageEngine};
use super::super::strategy::{select_strategies, StrategyKind};
use super::common::*;

fn engine() -> LeverageEngine {
    LeverageEngine::new(LeverageConfig::default())
}

#[test]
fn charity_route_tops_the_plan_when_income_is_below_threshold() {
    let price = PriceComparison::evaluate(350_000, 120_000);
    let profile = charitable_profile();
    let leverage = engine().assess(&price, &profile, Some(250_000));

    let plan = select_strategies(&price, &profile, &leverage, Some(250_000));
    assert_eq!(plan.primary().strategy.kind, StrategyKind::CharityCare);
    assert_eq!(plan.primary().priority, 1);
}

#[test]
fn significant_overcharge_selects_the_dispute_route() {
    let price = PriceComparison::evaluate(350_000, 120_000);
    assert_eq!(price.severity, OverchargeSeverity::Significant);
    assert_eq!(price.overcharge_percentage, 191.7);

    let profile = plain_profile();
    let leverage = engine().assess(&price, &profile, None);
    let plan = select_strategies(&price, &profile, &leverage, None);

    assert_eq!(
        plan.primary().strategy.kind,
        StrategyKind::DisputeAndNegotiate
    );
    assert!(plan
        .primary()
        .reason
        .contains("192% above the reference rate"));
}

#[test]
fn aggressive_route_requires_a_high_leverage_tier() {
    let price = PriceComparison::evaluate(130_000, 100_000);
    let profile = charitable_profile();
    let leverage = engine().assess(&price, &profile, None);

    let plan = select_strategies(&price, &profile, &leverage, None);
    assert!(plan
        .ranked()
        .iter()
        .any(|entry| entry.strategy.kind == StrategyKind::AggressiveNegotiation));
}

#[test]
fn standard_negotiation_is_always_applicable() {
    let price = PriceComparison::evaluate(100_000, 100_000);
    let profile = plain_profile();
    let leverage = engine().assess(&price, &profile, None);

    let plan = select_strategies(&price, &profile, &leverage, None);
    assert_eq!(
        plan.primary().strategy.kind,
        StrategyKind::StandardNegotiation
    );
    assert_eq!(plan.ranked().len(), 1);
    assert!(plan.alternatives().is_empty());
}

#[test]
fn forum_filing_is_appended_for_material_overcharges() {
    let price = PriceComparison::evaluate(350_000, 120_000);
    let profile = plain_profile();
    let leverage = engine().assess(&price, &profile, None);

    let plan = select_strategies(&price, &profile, &leverage, None);
    let last = plan.ranked().last().expect("plan never empty");
    assert_eq!(last.strategy.kind, StrategyKind::FormalComplaint);
    assert_eq!(last.priority, 5);
}

#[test]
fn ranked_strategies_are_distinct_and_priority_ordered() {
    let price = PriceComparison::evaluate(350_000, 120_000);
    let profile = charitable_profile();
    let leverage = engine().assess(&price, &profile, Some(250_000));

    let plan = select_strategies(&price, &profile, &leverage, Some(250_000));
    let kinds: Vec<_> = plan
        .ranked()
        .iter()
        .map(|entry| entry.strategy.kind)
        .collect();
    let mut deduped = kinds.clone();
    deduped.dedup();
    assert_eq!(kinds, deduped);

    for pair in plan.ranked().windows(2) {
        assert!(pair[0].priority < pair[1].priority);
    }

    assert!(plan.recommendation().contains("Charity Care Application"));
}
