use super::super::domain::{OverchargeSeverity, PriceComparison};
use super::super::intel::CounterpartyProfile;
use super::config::LeverageConfig;
use super::{LeverageCategory, LeveragePoint, LeverageSeverity};

/// Walk every pressure signal and emit a point for each one that qualifies.
/// Scores are additive and independently capped; ordering happens upstream.
pub(crate) fn collect_points(
    price: &PriceComparison,
    profile: &CounterpartyProfile,
    declared_annual_income: Option<i64>,
    config: &LeverageConfig,
) -> Vec<LeveragePoint> {
    let mut points = Vec::new();

    if price.severity >= OverchargeSeverity::Significant {
        let percentage = price.overcharge_percentage;
        let severity = if percentage > config.severe_overcharge_pct {
            LeverageSeverity::High
        } else {
            LeverageSeverity::Medium
        };
        points.push(LeveragePoint {
            category: LeverageCategory::OverchargePricing,
            severity,
            score: (percentage / config.overcharge_divisor).min(config.overcharge_cap),
            title: format!("Overcharged by {percentage:.0}% vs the reference rate"),
            detail: format!(
                "You were billed {} against a published reference rate of {}. The counterparty \
                 already honors that rate for empanelled claimants, so it should be negotiable here.",
                price.billed_amount, price.reference_amount
            ),
            evidence: format!(
                "Reference rate: {} | Billed: {}",
                price.reference_amount, price.billed_amount
            ),
            recommended_action: "Demand an itemized bill and question each charge against the reference rate",
        });
    }

    if profile.rate_program_empanelled {
        points.push(LeveragePoint {
            category: LeverageCategory::RateProgramEmpanelment,
            severity: LeverageSeverity::High,
            score: 25.0,
            title: "Counterparty accepts the public reference rate".to_string(),
            detail: format!(
                "{} is empanelled in the reference-rate program and routinely accepts the mandated \
                 rate. It cannot claim those rates are unsustainable while accepting them daily.",
                profile.name
            ),
            evidence: "Rate-program empanelment status: active".to_string(),
            recommended_action: "Quote the empanelment and demand the same rate",
        });
    }

    if profile.charitable_trust {
        points.push(LeveragePoint {
            category: LeverageCategory::CharitableObligation,
            severity: LeverageSeverity::High,
            score: 30.0,
            title: "Charitable trust must provide subsidized care".to_string(),
            detail: format!(
                "{} is registered as a charitable trust and enjoys tax exemptions. In exchange it \
                 is legally required to provide subsidized care; failing to do so puts the \
                 exemption at risk.",
                profile.name
            ),
            evidence: "Registration: charitable trust | Tax status: exempt".to_string(),
            recommended_action: "Demand the charity care application and quote the legal obligation",
        });

        if let Some(threshold) = profile.charity_income_threshold {
            let below = declared_annual_income
                .map(|income| income < threshold)
                .unwrap_or(false);
            points.push(LeveragePoint {
                category: LeverageCategory::CharityCareEligibility,
                severity: if below {
                    LeverageSeverity::High
                } else {
                    LeverageSeverity::Medium
                },
                score: 20.0,
                title: format!("Charity care income threshold: {threshold}/year"),
                detail: format!(
                    "The charity care policy covers claimants earning under {threshold}/year. \
                     Qualifying claimants may be entitled to free or heavily subsidized care."
                ),
                evidence: format!("Disclosed income threshold: {threshold}"),
                recommended_action: "Apply for charity care immediately",
            });
        }
    }

    if let Some(quota) = &profile.set_aside_quota {
        points.push(LeveragePoint {
            category: LeverageCategory::SetAsideQuota,
            severity: LeverageSeverity::Medium,
            score: 15.0,
            title: format!("Reserved-capacity quota: {quota}"),
            detail: format!(
                "The jurisdiction mandates that {quota} be reserved at subsidized rates. \
                 Compliance is routinely under-audited.",
            ),
            evidence: format!("Jurisdiction mandate: {quota}"),
            recommended_action: "File an information request on quota compliance",
        });
    }

    if profile.accredited {
        let validity = profile
            .accreditation_valid_until
            .map(|date| date.to_string())
            .unwrap_or_else(|| "active".to_string());
        points.push(LeveragePoint {
            category: LeverageCategory::AccreditationStandards,
            severity: LeverageSeverity::Medium,
            score: 15.0,
            title: "Accredited and bound by published standards".to_string(),
            detail: "Accreditation requires transparent billing under published consumer \
                     standards; violations can be reported to the accreditor."
                .to_string(),
            evidence: format!("Accreditation valid until: {validity}"),
            recommended_action: "Raise an accreditor complaint for billing standard violations",
        });
    }

    if profile.complaints_last_year > config.complaint_threshold {
        points.push(LeveragePoint {
            category: LeverageCategory::ComplaintVolume,
            severity: if profile.complaints_last_year > config.complaint_high_threshold {
                LeverageSeverity::High
            } else {
                LeverageSeverity::Medium
            },
            score: 20.0,
            title: format!(
                "{} consumer complaints in the last year",
                profile.complaints_last_year
            ),
            detail: "A high complaint volume makes the counterparty sensitive to one more \
                     complaint on the record and to the publicity around it."
                .to_string(),
            evidence: format!(
                "Consumer complaints: {} | Regulator complaints: {}",
                profile.complaints_last_year, profile.regulator_complaints
            ),
            recommended_action: "Mention you are prepared to add to their complaint record",
        });
    }

    if !profile.recent_violations.is_empty() {
        let listed = profile.recent_violations.join(", ");
        points.push(LeveragePoint {
            category: LeverageCategory::RegulatoryViolations,
            severity: LeverageSeverity::High,
            score: 25.0,
            title: "Recent regulatory violations".to_string(),
            detail: format!(
                "Recent violations on record: {listed}. The counterparty is under scrutiny and \
                 will want to avoid additional attention."
            ),
            evidence: format!("Violations: {listed}"),
            recommended_action: "Reference the violation history in the complaint",
        });
    }

    points.push(LeveragePoint {
        category: LeverageCategory::ConsumerProtection,
        severity: LeverageSeverity::High,
        score: 20.0,
        title: "Consumer protection statute applies".to_string(),
        detail: "Billing for services falls under consumer protection law. A complaint can be \
                 filed for unfair trade practices, deficiency in service, or excessive charging, \
                 and forums have awarded substantial compensation in billing cases."
            .to_string(),
        evidence: "Consumer protection statute covers billed services".to_string(),
        recommended_action: "Threaten a consumer forum complaint citing specific provisions",
    });

    points.push(LeveragePoint {
        category: LeverageCategory::ItemizedBillingRight,
        severity: LeverageSeverity::Medium,
        score: 15.0,
        title: "Right to an itemized bill".to_string(),
        detail: "Claimants have a legal right to a fully itemized bill. Summary-only bills are \
                 a common way to hide overcharges."
            .to_string(),
        evidence: "Itemized disclosure mandated by consumer and establishment rules".to_string(),
        recommended_action: "Demand complete itemization before any payment",
    });

    points.push(LeveragePoint {
        category: LeverageCategory::InsuranceOversight,
        severity: LeverageSeverity::Medium,
        score: 10.0,
        title: "Insurance regulator oversight".to_string(),
        detail: "Where insurance is involved, the regulator imposes strict timelines on cashless \
                 settlement and bars pay-now-claim-later pressure for empanelled services."
            .to_string(),
        evidence: "Insurance regulator settlement guidelines".to_string(),
        recommended_action: "Involve the insurer or administrator in the negotiation",
    });

    if profile.pr_sensitive() {
        points.push(LeveragePoint {
            category: LeverageCategory::ReputationRisk,
            severity: LeverageSeverity::Medium,
            score: 15.0,
            title: "Reputation sensitivity".to_string(),
            detail: "This counterparty has a record of responding to public complaints and media \
                     attention; a well-documented public post is an effective escalation."
                .to_string(),
            evidence: "Responds to public complaints, typically within 24-48 hours".to_string(),
            recommended_action: "Prepare a documented public post as an escalation option",
        });
    }

    points
}
