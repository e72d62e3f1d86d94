use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier wrapper for opened dispute cases.
///
/// Derived from the creation inputs plus the opening timestamp, so the same
/// filing opened at the same instant always yields the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The eight dispatchable pressure stages, in campaign order.
///
/// `Submitted` (day 0) is the case-open anchor and `Resolved` the terminal
/// case status; neither produces an outbound action, so neither appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStage {
    EmailPrimary,
    EmailEscalated,
    FormalGrievance,
    FormalComplaintFiling,
    InformationRequest,
    CentralGrievance,
    MediaAlert,
    PublicPressure,
}

impl EscalationStage {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::EmailPrimary,
            Self::EmailEscalated,
            Self::FormalGrievance,
            Self::FormalComplaintFiling,
            Self::InformationRequest,
            Self::CentralGrievance,
            Self::MediaAlert,
            Self::PublicPressure,
        ]
    }

    /// Days after case opening at which the stage becomes due.
    pub const fn day_offset(self) -> i64 {
        match self {
            Self::EmailPrimary => 1,
            Self::EmailEscalated => 3,
            Self::FormalGrievance => 5,
            Self::FormalComplaintFiling => 7,
            Self::InformationRequest => 10,
            Self::CentralGrievance => 14,
            Self::MediaAlert => 21,
            Self::PublicPressure => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EmailPrimary => "email_primary",
            Self::EmailEscalated => "email_escalated",
            Self::FormalGrievance => "formal_grievance",
            Self::FormalComplaintFiling => "formal_complaint_filing",
            Self::InformationRequest => "information_request",
            Self::CentralGrievance => "central_grievance",
            Self::MediaAlert => "media_alert",
            Self::PublicPressure => "public_pressure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|stage| stage.label() == value)
    }
}

/// Lifecycle status of a case. `Paused` freezes due-action evaluation without
/// touching the stored schedule; `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Active,
    Paused,
    Resolved,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a resolved case was closed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    Negotiated,
    CharityCare,
    ComplaintUpheld,
    Withdrawn,
}

impl ResolutionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Negotiated => "negotiated",
            Self::CharityCare => "charity_care",
            Self::ComplaintUpheld => "complaint_upheld",
            Self::Withdrawn => "withdrawn",
        }
    }
}

/// Severity ladder for a billed amount measured against the reference rate.
///
/// Ordered ascending so range checks (`>= Significant`) read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverchargeSeverity {
    Valid,
    Fair,
    Slight,
    Moderate,
    Significant,
    Severe,
}

impl OverchargeSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Fair => "fair_pricing",
            Self::Slight => "slight_overcharge",
            Self::Moderate => "moderate_overcharge",
            Self::Significant => "significant_overcharge",
            Self::Severe => "severe_overcharge",
        }
    }

    pub const fn detail(self) -> &'static str {
        match self {
            Self::Valid => "Bill is at or below the reference rate; no overcharging detected",
            Self::Fair => "Bill is within 20% of the reference rate; this is fair market pricing",
            Self::Slight => "Bill is 20-50% above the reference rate; minor negotiation possible",
            Self::Moderate => "Bill is 50-100% above the reference rate; negotiation possible",
            Self::Significant => "Bill is more than 2x the reference rate; dispute recommended",
            Self::Severe => "Bill is more than 3x the reference rate; strong case for dispute",
        }
    }

    pub const fn dispute_recommended(self) -> bool {
        matches!(
            self,
            Self::Slight | Self::Moderate | Self::Significant | Self::Severe
        )
    }
}

/// Billed amount measured against the authoritative reference rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub billed_amount: i64,
    pub reference_amount: i64,
    pub overcharge_amount: i64,
    pub overcharge_percentage: f64,
    pub severity: OverchargeSeverity,
}

impl PriceComparison {
    /// A non-positive reference rate cannot anchor a percentage, so the
    /// comparison degrades to a zero overcharge instead of failing.
    pub fn evaluate(billed_amount: i64, reference_amount: i64) -> Self {
        if reference_amount <= 0 {
            return Self {
                billed_amount,
                reference_amount,
                overcharge_amount: 0,
                overcharge_percentage: 0.0,
                severity: OverchargeSeverity::Valid,
            };
        }

        let billed = billed_amount as f64;
        let reference = reference_amount as f64;
        let overcharge_percentage = round_tenth((billed - reference) / reference * 100.0);

        let severity = if billed > reference * 3.0 {
            OverchargeSeverity::Severe
        } else if billed > reference * 2.0 {
            OverchargeSeverity::Significant
        } else if billed > reference * 1.5 {
            OverchargeSeverity::Moderate
        } else if billed > reference * 1.2 {
            OverchargeSeverity::Slight
        } else if billed > reference {
            OverchargeSeverity::Fair
        } else {
            OverchargeSeverity::Valid
        };

        Self {
            billed_amount,
            reference_amount,
            overcharge_amount: billed_amount - reference_amount,
            overcharge_percentage,
            severity,
        }
    }
}

/// Who the dispute is against and where they operate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyRef {
    pub name: String,
    pub jurisdiction: String,
}

/// Inputs required to open a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeFiling {
    pub counterparty: CounterpartyRef,
    /// Description of the disputed line item or service.
    pub item: String,
    pub billed_amount: i64,
    pub fair_amount: i64,
    #[serde(default)]
    pub claimant_name: Option<String>,
    #[serde(default)]
    pub claimant_email: Option<String>,
    #[serde(default)]
    pub counterparty_email: Option<String>,
    /// Declared annual income, used for charity-care eligibility checks.
    #[serde(default)]
    pub declared_annual_income: Option<i64>,
}

/// One scheduled escalation step. `scheduled_at` is fixed at case creation
/// and never recomputed; only the execution and response fields mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub stage: EscalationStage,
    pub scheduled_at: DateTime<Utc>,
    pub executed: bool,
    pub executed_at: Option<DateTime<Utc>>,
    pub response_received: bool,
    pub response_at: Option<DateTime<Utc>>,
    pub response_note: Option<String>,
    pub skip_reason: Option<String>,
}

impl ScheduledAction {
    pub fn new(stage: EscalationStage, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            stage,
            scheduled_at,
            executed: false,
            executed_at: None,
            response_received: false,
            response_at: None,
            response_note: None,
            skip_reason: None,
        }
    }

    /// Due means the schedule has elapsed and neither a dispatch nor a
    /// satisfying counterparty response has been recorded.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.executed && !self.response_received && self.scheduled_at <= now
    }
}

/// One active dispute and its materialized escalation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeCase {
    pub id: CaseId,
    pub opened_at: DateTime<Utc>,
    pub counterparty: CounterpartyRef,
    pub item: String,
    pub billed_amount: i64,
    pub fair_amount: i64,
    pub overcharge_percentage: f64,
    pub status: CaseStatus,
    pub pause_reason: Option<String>,
    pub responses_received: u32,
    pub last_response_at: Option<DateTime<Utc>>,
    pub settlement_offered: Option<i64>,
    pub settlement_accepted: bool,
    pub claimant_name: Option<String>,
    pub claimant_email: Option<String>,
    pub counterparty_email: Option<String>,
    pub actions: Vec<ScheduledAction>,
}

impl DisputeCase {
    /// Materialize a case from a filing and its pre-built action schedule.
    pub fn open(
        filing: DisputeFiling,
        opened_at: DateTime<Utc>,
        actions: Vec<ScheduledAction>,
    ) -> Self {
        let id = Self::derive_id(&filing, opened_at);
        let overcharge_percentage = if filing.fair_amount > 0 {
            round_tenth(
                (filing.billed_amount - filing.fair_amount) as f64 / filing.fair_amount as f64
                    * 100.0,
            )
        } else {
            0.0
        };

        Self {
            id,
            opened_at,
            counterparty: filing.counterparty,
            item: filing.item,
            billed_amount: filing.billed_amount,
            fair_amount: filing.fair_amount,
            overcharge_percentage,
            status: CaseStatus::Active,
            pause_reason: None,
            responses_received: 0,
            last_response_at: None,
            settlement_offered: None,
            settlement_accepted: false,
            claimant_name: filing.claimant_name,
            claimant_email: filing.claimant_email,
            counterparty_email: filing.counterparty_email,
            actions,
        }
    }

    pub fn derive_id(filing: &DisputeFiling, opened_at: DateTime<Utc>) -> CaseId {
        let mut hasher = Sha256::new();
        hasher.update(filing.counterparty.name.as_bytes());
        hasher.update(filing.item.as_bytes());
        hasher.update(filing.billed_amount.to_be_bytes());
        hasher.update(opened_at.to_rfc3339().as_bytes());
        let digest = hasher.finalize();

        let mut token = String::with_capacity(12);
        for byte in digest.iter().take(6) {
            token.push_str(&format!("{byte:02X}"));
        }
        CaseId(token)
    }

    pub fn action(&self, stage: EscalationStage) -> Option<&ScheduledAction> {
        self.actions.iter().find(|action| action.stage == stage)
    }

    pub fn action_mut(&mut self, stage: EscalationStage) -> Option<&mut ScheduledAction> {
        self.actions.iter_mut().find(|action| action.stage == stage)
    }

    pub fn executed_count(&self) -> usize {
        self.actions.iter().filter(|action| action.executed).count()
    }

    /// The latest stage that has actually been dispatched.
    pub fn furthest_stage(&self) -> Option<EscalationStage> {
        self.actions
            .iter()
            .filter(|action| action.executed)
            .map(|action| action.stage)
            .last()
    }

    pub fn next_pending(&self) -> Option<&ScheduledAction> {
        self.actions.iter().find(|action| !action.executed)
    }
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
