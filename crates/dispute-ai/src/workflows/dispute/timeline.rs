use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::domain::{CaseId, DisputeCase, EscalationStage, ScheduledAction};

/// Materialize the full action schedule for a case opened at `opened_at`.
///
/// Every stage is generated eagerly so the whole timeline is inspectable
/// before anything fires; offsets come from the fixed per-stage table.
pub fn build_schedule(opened_at: DateTime<Utc>) -> Vec<ScheduledAction> {
    EscalationStage::ordered()
        .into_iter()
        .map(|stage| ScheduledAction::new(stage, opened_at + Duration::days(stage.day_offset())))
        .collect()
}

/// Case context repeated on every due-action descriptor so a dispatcher can
/// render its artifact without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub case_id: CaseId,
    pub counterparty: String,
    pub jurisdiction: String,
    pub item: String,
    pub billed_amount: i64,
    pub fair_amount: i64,
    pub overcharge_percentage: f64,
}

impl From<&DisputeCase> for CaseSummary {
    fn from(case: &DisputeCase) -> Self {
        Self {
            case_id: case.id.clone(),
            counterparty: case.counterparty.name.clone(),
            jurisdiction: case.counterparty.jurisdiction.clone(),
            item: case.item.clone(),
            billed_amount: case.billed_amount,
            fair_amount: case.fair_amount,
            overcharge_percentage: case.overcharge_percentage,
        }
    }
}

/// Stage-specific dispatch payload. Each variant carries exactly the fields
/// that stage's dispatcher needs; the match in [`action_details`] keeps the
/// set complete whenever a stage is added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionDetails {
    EmailPrimary {
        recipient: &'static str,
        subject: String,
        template: &'static str,
    },
    EmailEscalated {
        recipient: &'static str,
        subject: String,
        template: &'static str,
        note: &'static str,
    },
    FormalGrievance {
        recipient: &'static str,
        subject: String,
        template: &'static str,
    },
    FormalComplaintFiling {
        portal: &'static str,
        filing_type: &'static str,
        template: &'static str,
    },
    InformationRequest {
        portal: &'static str,
        filing_type: &'static str,
        questions: Vec<String>,
    },
    CentralGrievance {
        portal: &'static str,
        authority: &'static str,
        template: &'static str,
    },
    MediaAlert {
        pitch_template: &'static str,
        hashtags: Vec<&'static str>,
    },
    PublicPressure {
        platforms: Vec<&'static str>,
        template: &'static str,
        include_evidence: bool,
    },
}

/// An action whose scheduled time has elapsed, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueAction {
    pub case: CaseSummary,
    pub stage: EscalationStage,
    pub scheduled_at: DateTime<Utc>,
    pub details: ActionDetails,
}

pub fn action_details(case: &DisputeCase, stage: EscalationStage) -> ActionDetails {
    match stage {
        EscalationStage::EmailPrimary => ActionDetails::EmailPrimary {
            recipient: "billing_department",
            subject: format!("Billing Dispute - Case #{}", case.id),
            template: "dispute_initial",
        },
        EscalationStage::EmailEscalated => ActionDetails::EmailEscalated {
            recipient: "executive_office",
            subject: format!("ESCALATED: Billing Dispute - Case #{}", case.id),
            template: "dispute_escalation",
            note: "No response from the billing contact after 48 hours",
        },
        EscalationStage::FormalGrievance => ActionDetails::FormalGrievance {
            recipient: "grievance_cell",
            subject: format!("Formal Grievance: Excessive Billing - Case #{}", case.id),
            template: "formal_grievance",
        },
        EscalationStage::FormalComplaintFiling => ActionDetails::FormalComplaintFiling {
            portal: "consumer disputes forum",
            filing_type: "consumer_complaint",
            template: "consumer_complaint_filing",
        },
        EscalationStage::InformationRequest => ActionDetails::InformationRequest {
            portal: "public information request portal",
            filing_type: "information_request",
            questions: vec![
                format!(
                    "What are the published reference rates for {} at {}?",
                    case.item, case.counterparty.name
                ),
                format!(
                    "Is {} empanelled under the public reference-rate program? If yes, provide empanelment details.",
                    case.counterparty.name
                ),
                "What is the organisation's charity care policy and reserved-capacity quota compliance?".to_string(),
                "How many billing complaints have been received in the past 12 months?".to_string(),
            ],
        },
        EscalationStage::CentralGrievance => ActionDetails::CentralGrievance {
            portal: "central grievance portal",
            authority: "consumer affairs directorate",
            template: "central_grievance",
        },
        EscalationStage::MediaAlert => ActionDetails::MediaAlert {
            pitch_template: "journalist_pitch",
            hashtags: vec!["BillingDispute", "ConsumerRights", "FairPricing"],
        },
        EscalationStage::PublicPressure => ActionDetails::PublicPressure {
            platforms: vec!["twitter", "linkedin"],
            template: "public_pressure_post",
            include_evidence: true,
        },
    }
}
