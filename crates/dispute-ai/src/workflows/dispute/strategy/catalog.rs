use serde::{Deserialize, Serialize};

/// The named approaches the selector can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    CharityCare,
    DisputeAndNegotiate,
    AggressiveNegotiation,
    StandardNegotiation,
    FormalComplaint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

/// Immutable reference data for one strategy: what it is, how it has
/// historically performed, and the steps it prescribes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyDefinition {
    pub kind: StrategyKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Historical success rate, percent.
    pub success_rate: f64,
    /// Historical typical discount, percent.
    pub typical_discount: f64,
    pub time_to_resolution: &'static str,
    pub effort: EffortLevel,
    pub steps: &'static [&'static str],
    pub requirements: &'static [&'static str],
}

pub const fn definition(kind: StrategyKind) -> StrategyDefinition {
    match kind {
        StrategyKind::CharityCare => StrategyDefinition {
            kind,
            name: "Charity Care Application",
            description: "Apply to the counterparty's charity care program for free or subsidized treatment",
            success_rate: 85.0,
            typical_discount: 80.0,
            time_to_resolution: "2-4 weeks",
            effort: EffortLevel::Low,
            steps: &[
                "Request the charity care application form from the billing department",
                "Submit income documentation (payslips, tax returns, bank statements)",
                "Follow up within 7 days if no response",
                "Escalate to the administrator if denied without a valid reason",
            ],
            requirements: &[
                "Income below the counterparty's disclosed threshold",
                "Counterparty is a charitable trust or publishes a charity policy",
            ],
        },
        StrategyKind::DisputeAndNegotiate => StrategyDefinition {
            kind,
            name: "Dispute Errors + Negotiate",
            description: "Challenge billing errors first, then negotiate on the corrected amount",
            success_rate: 70.0,
            typical_discount: 50.0,
            time_to_resolution: "2-6 weeks",
            effort: EffortLevel::Medium,
            steps: &[
                "Demand a fully itemized bill",
                "Identify and formally dispute errors and overcharges",
                "Request correction in writing",
                "Negotiate the final amount against the reference rate",
                "Get the settlement in writing before payment",
            ],
            requirements: &[
                "Billing errors identified",
                "Significant overcharge versus reference rates",
            ],
        },
        StrategyKind::AggressiveNegotiation => StrategyDefinition {
            kind,
            name: "Aggressive Negotiation",
            description: "Use every leverage point to pressure the counterparty into a significant discount",
            success_rate: 65.0,
            typical_discount: 45.0,
            time_to_resolution: "1-4 weeks",
            effort: EffortLevel::Medium,
            steps: &[
                "Send a formal letter citing every leverage point",
                "Reference the specific statutes and obligations involved",
                "Set a 7-day deadline for a response",
                "Follow up with a call to the billing supervisor",
                "Escalate to the administrator or executive office if needed",
            ],
            requirements: &[
                "Multiple strong leverage points",
                "Counterparty has documented vulnerabilities",
            ],
        },
        StrategyKind::StandardNegotiation => StrategyDefinition {
            kind,
            name: "Standard Negotiation",
            description: "Request a discount citing financial hardship and market rates",
            success_rate: 55.0,
            typical_discount: 30.0,
            time_to_resolution: "1-3 weeks",
            effort: EffortLevel::Low,
            steps: &[
                "Call the billing department and request a discount",
                "Mention financial hardship where applicable",
                "Quote the published reference rates",
                "Ask for a payment plan if a lump sum is difficult",
                "Get any agreement in writing",
            ],
            requirements: &[],
        },
        StrategyKind::FormalComplaint => StrategyDefinition {
            kind,
            name: "Consumer Forum Filing",
            description: "File a complaint with the consumer disputes forum for unfair trade practices",
            success_rate: 75.0,
            typical_discount: 60.0,
            time_to_resolution: "3-12 months",
            effort: EffortLevel::High,
            steps: &[
                "Gather all documentation: bills, correspondence, evidence",
                "Draft the complaint citing the specific violations",
                "File with the appropriate consumer forum tier",
                "Attend hearings (often available remotely)",
                "Most cases settle before the final hearing",
            ],
            requirements: &[
                "Clear evidence of overcharging or deficiency",
                "Willingness to pursue the legal route",
            ],
        },
    }
}
