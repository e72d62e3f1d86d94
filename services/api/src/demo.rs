use crate::driver;
use crate::infra::{
    default_leverage_config, InMemoryCaseRepository, StaticDirectoryLookup, TracingDispatcher,
};
use chrono::{Duration, Utc};
use clap::Args;
use std::sync::Arc;

use dispute_ai::error::AppError;
use dispute_ai::workflows::dispute::{
    CounterpartyRef, DisputeAnalysis, DisputeFiling, EscalationScheduler, RateAndProfileLookup,
    ResolutionKind,
};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Counterparty being disputed
    #[arg(long, default_value = "Lakeside Memorial Care")]
    pub(crate) counterparty: String,
    /// Jurisdiction the counterparty operates in
    #[arg(long, default_value = "Westmark")]
    pub(crate) jurisdiction: String,
    /// Disputed item or service description
    #[arg(long, default_value = "orthopedic implant package")]
    pub(crate) item: String,
    /// Amount billed
    #[arg(long, default_value_t = 350_000)]
    pub(crate) billed: i64,
    /// Override the directory's reference rate
    #[arg(long)]
    pub(crate) reference: Option<i64>,
    /// Declared annual income, for charity-care eligibility
    #[arg(long)]
    pub(crate) income: Option<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) analyze: AnalyzeArgs,
    /// Settlement figure the counterparty offers mid-campaign
    #[arg(long, default_value_t = 140_000)]
    pub(crate) settlement_offer: i64,
}

fn resolve_inputs(
    args: &AnalyzeArgs,
    lookup: &StaticDirectoryLookup,
) -> Option<(i64, dispute_ai::workflows::dispute::CounterpartyProfile)> {
    let reference = match args.reference {
        Some(reference) => Some(reference),
        None => match lookup.reference_rate(&args.item, &args.jurisdiction) {
            Ok(reference) => reference,
            Err(err) => {
                println!("Reference directory unavailable: {err}");
                return None;
            }
        },
    };

    let Some(reference) = reference else {
        println!(
            "No reference rate on record for '{}' in {}. Pass --reference to supply one.",
            args.item, args.jurisdiction
        );
        return None;
    };

    let profile = match lookup.counterparty_profile(&args.counterparty, &args.jurisdiction) {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            StaticDirectoryLookup::fallback_profile(&args.counterparty, &args.jurisdiction)
        }
        Err(err) => {
            println!("Reference directory unavailable: {err}");
            return None;
        }
    };

    Some((reference, profile))
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let lookup = StaticDirectoryLookup::seeded();
    let Some((reference, profile)) = resolve_inputs(&args, &lookup) else {
        return Ok(());
    };

    let analysis =
        DisputeAnalysis::build(args.billed, reference, &profile, args.income, &default_leverage_config());
    render_analysis(&args, reference, &analysis);
    Ok(())
}

fn render_analysis(args: &AnalyzeArgs, reference: i64, analysis: &DisputeAnalysis) {
    println!("Dispute analysis: {} vs {}", args.item, args.counterparty);
    println!(
        "Billed {} | reference {} | overcharge {:.1}% ({})",
        args.billed,
        reference,
        analysis.price.overcharge_percentage,
        analysis.price.severity.label()
    );
    println!("  {}", analysis.price.severity.detail());

    println!(
        "\nCounterparty vulnerability: {} (score {}/100)",
        analysis.vulnerability.level.label(),
        analysis.vulnerability.score
    );
    for finding in &analysis.vulnerability.findings {
        println!("  - {finding}");
    }

    println!(
        "\nLeverage: {} (score {:.0}/200)",
        analysis.leverage.tier.label(),
        analysis.leverage.total_score
    );
    println!("  {}", analysis.leverage.summary);
    for point in analysis.leverage.top_three() {
        println!(
            "  - [{:?}] {} (+{:.0})",
            point.severity, point.title, point.score
        );
        println!("    {}", point.recommended_action);
    }

    println!("\nStrategy plan");
    for entry in analysis.plan.ranked() {
        println!(
            "  {}. {} ({}% success, {}% typical discount)",
            entry.priority,
            entry.strategy.name,
            entry.strategy.success_rate,
            entry.strategy.typical_discount
        );
        println!("     {}", entry.reason);
    }
    println!("  {}", analysis.recommendation);
    println!("\nPrimary strategy steps");
    for step in analysis.plan.primary().strategy.steps {
        println!("  - {step}");
    }

    let prediction = &analysis.prediction;
    println!(
        "\nForecast: {:.0}% success, {:.0}% expected discount ({} confidence)",
        prediction.success_probability,
        prediction.expected_discount.percentage,
        prediction.confidence.label()
    );
    println!("  {}", prediction.confidence.explanation());
    println!(
        "  Expected final amount: {} - {} (mid {})",
        prediction.expected_final_amount.low,
        prediction.expected_final_amount.high,
        prediction.expected_final_amount.mid
    );
    println!(
        "  Savings estimate: {} expected (range {} - {})",
        prediction.savings_estimate.expected,
        prediction.savings_estimate.minimum,
        prediction.savings_estimate.maximum
    );
    println!("  Time estimate: {}", prediction.time_estimate);
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        analyze,
        settlement_offer,
    } = args;

    println!("Dispute escalation demo\n");
    let lookup = StaticDirectoryLookup::seeded();
    let Some((reference, profile)) = resolve_inputs(&analyze, &lookup) else {
        return Ok(());
    };

    let analysis = DisputeAnalysis::build(
        analyze.billed,
        reference,
        &profile,
        analyze.income,
        &default_leverage_config(),
    );
    render_analysis(&analyze, reference, &analysis);

    let repository = Arc::new(InMemoryCaseRepository::default());
    let scheduler = EscalationScheduler::new(repository.clone());
    let dispatcher = TracingDispatcher::default();

    let opened_at = Utc::now();
    let filing = DisputeFiling {
        counterparty: CounterpartyRef {
            name: analyze.counterparty.clone(),
            jurisdiction: analyze.jurisdiction.clone(),
        },
        item: analyze.item.clone(),
        billed_amount: analyze.billed,
        fair_amount: reference,
        claimant_name: None,
        claimant_email: None,
        counterparty_email: None,
        declared_annual_income: analyze.income,
    };
    let case = match scheduler.open_case(filing, opened_at) {
        Ok(case) => case,
        Err(err) => {
            println!("  Could not open the demo case: {err}");
            return Ok(());
        }
    };

    println!("\nOpened case {} with {} scheduled actions", case.id, case.actions.len());
    for action in &case.actions {
        println!(
            "  day +{:>2}: {}",
            action.stage.day_offset(),
            action.stage.label()
        );
    }

    println!("\nFast-forwarding the first week of polling");
    for day in [1, 3, 5, 7] {
        driver::poll_once(
            &repository,
            &scheduler,
            &dispatcher,
            opened_at + Duration::days(day),
        );
    }
    for (case_id, summary) in dispatcher.executed() {
        println!("  [{case_id}] {summary}");
    }

    let response_at = opened_at + Duration::days(8);
    match scheduler.record_response(
        &case.id,
        "Revised offer after internal review".to_string(),
        Some(settlement_offer),
        response_at,
    ) {
        Ok(ack) => {
            if let Some(settlement) = &ack.settlement {
                println!(
                    "\nCounterparty offered {} (max acceptable {}): {:?}",
                    settlement.offered, settlement.max_acceptable, settlement.recommendation
                );
            }
        }
        Err(err) => println!("  Could not record the response: {err}"),
    }

    match scheduler.resolve(
        &case.id,
        settlement_offer,
        ResolutionKind::Negotiated,
        opened_at + Duration::days(9),
    ) {
        Ok(summary) => {
            println!(
                "\nResolved: {} -> {} ({} saved, {:.1}%)",
                summary.original_bill,
                summary.final_amount,
                summary.total_savings,
                summary.savings_percentage
            );
            if let Some(stage) = summary.stage_reached {
                println!(
                    "Campaign reached the {} stage before settling.",
                    stage.label()
                );
            }
        }
        Err(err) => println!("  Could not resolve the case: {err}"),
    }

    Ok(())
}
