use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::super::domain::{
    round_tenth, CaseId, CaseStatus, DisputeCase, DisputeFiling, EscalationStage, ResolutionKind,
    ScheduledAction,
};
use super::super::timeline::{action_details, build_schedule, CaseSummary, DueAction};
use super::repository::{CaseRepository, RepositoryError};

/// Accepting a settlement at up to 20% above the fair rate beats months of
/// further escalation.
const ACCEPTABLE_SETTLEMENT_MARGIN: f64 = 1.2;

/// Owns the case lifecycle: materializes timelines at open, answers due-action
/// polls, and applies response/pause/resolve transitions.
///
/// Every operation serializes on a per-case guard, so concurrent calls against
/// one case never interleave a read-modify-write, while unrelated cases
/// proceed in parallel.
pub struct EscalationScheduler<R> {
    repository: Arc<R>,
    locks: Mutex<HashMap<CaseId, Arc<Mutex<()>>>>,
}

impl<R> EscalationScheduler<R>
where
    R: CaseRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn case_guard(&self, id: &CaseId) -> Arc<Mutex<()>> {
        let mut registry = self.locks.lock().expect("case lock registry poisoned");
        registry.entry(id.clone()).or_default().clone()
    }

    fn fetch_case(&self, id: &CaseId) -> Result<DisputeCase, SchedulerError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| SchedulerError::NotFound(id.clone()))
    }

    /// Open a case: derive its identifier, compute the overcharge percentage
    /// (zero when the fair amount cannot anchor one), and materialize the
    /// complete action schedule before anything fires.
    pub fn open_case(
        &self,
        filing: DisputeFiling,
        opened_at: DateTime<Utc>,
    ) -> Result<DisputeCase, SchedulerError> {
        let schedule = build_schedule(opened_at);
        let case = DisputeCase::open(filing, opened_at, schedule);
        let stored = self.repository.insert(case)?;
        info!(
            case_id = %stored.id,
            counterparty = %stored.counterparty.name,
            overcharge_pct = stored.overcharge_percentage,
            "dispute case opened"
        );
        Ok(stored)
    }

    /// Actions whose schedule has elapsed for an active case. Executed and
    /// response-satisfied actions are excluded; polling twice before an
    /// execution is recorded returns the same set twice.
    pub fn due_actions(
        &self,
        id: &CaseId,
        now: DateTime<Utc>,
    ) -> Result<Vec<DueAction>, SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let case = self.fetch_case(id)?;
        if case.status != CaseStatus::Active {
            return Ok(Vec::new());
        }

        let summary = CaseSummary::from(&case);
        Ok(case
            .actions
            .iter()
            .filter(|action| action.is_due(now))
            .map(|action| DueAction {
                case: summary.clone(),
                stage: action.stage,
                scheduled_at: action.scheduled_at,
                details: action_details(&case, action.stage),
            })
            .collect())
    }

    /// Record a successful dispatch. Idempotent: a second call for the same
    /// stage acknowledges without touching the stored state.
    pub fn mark_executed(
        &self,
        id: &CaseId,
        stage: EscalationStage,
        executed_at: DateTime<Utc>,
    ) -> Result<ExecutionAck, SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let mut case = self.fetch_case(id)?;
        if case.status == CaseStatus::Resolved {
            return Err(SchedulerError::InvalidState {
                operation: "mark_executed",
                status: case.status,
            });
        }

        let action = case
            .action_mut(stage)
            .ok_or(SchedulerError::ActionNotFound {
                case_id: id.clone(),
                stage,
            })?;
        if action.executed {
            let executed_at = action.executed_at.unwrap_or(executed_at);
            return Ok(ExecutionAck {
                case_id: id.clone(),
                stage,
                executed_at,
                already_executed: true,
            });
        }

        action.executed = true;
        action.executed_at = Some(executed_at);
        self.repository.update(case)?;

        info!(case_id = %id, stage = stage.label(), "escalation action executed");
        Ok(ExecutionAck {
            case_id: id.clone(),
            stage,
            executed_at,
            already_executed: false,
        })
    }

    /// Record a counterparty response. Bumps the case counters, satisfies the
    /// next unexecuted action so exactly one pending escalation is suppressed
    /// per reply, and assesses any settlement figure against the fair rate.
    pub fn record_response(
        &self,
        id: &CaseId,
        content: String,
        settlement_offered: Option<i64>,
        received_at: DateTime<Utc>,
    ) -> Result<ResponseAck, SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let mut case = self.fetch_case(id)?;
        if case.status == CaseStatus::Resolved {
            return Err(SchedulerError::InvalidState {
                operation: "record_response",
                status: case.status,
            });
        }

        case.responses_received += 1;
        case.last_response_at = Some(received_at);

        if let Some(action) = case
            .actions
            .iter_mut()
            .find(|action| !action.executed && !action.response_received)
        {
            action.response_received = true;
            action.response_at = Some(received_at);
            action.response_note = Some(content);
            action.skip_reason = Some("counterparty responded before dispatch".to_string());
        }

        let settlement = settlement_offered.map(|offered| {
            case.settlement_offered = Some(offered);
            let max_acceptable = (case.fair_amount as f64 * ACCEPTABLE_SETTLEMENT_MARGIN).round()
                as i64;
            SettlementAssessment {
                offered,
                target_amount: case.fair_amount,
                max_acceptable,
                recommendation: if offered <= max_acceptable {
                    SettlementRecommendation::Accept
                } else {
                    SettlementRecommendation::Negotiate
                },
            }
        });

        let responses_received = case.responses_received;
        self.repository.update(case)?;

        Ok(ResponseAck {
            case_id: id.clone(),
            responses_received,
            settlement,
        })
    }

    /// Freeze due-action evaluation without altering the stored schedule.
    pub fn pause(&self, id: &CaseId, reason: String) -> Result<(), SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let mut case = self.fetch_case(id)?;
        match case.status {
            CaseStatus::Resolved => Err(SchedulerError::InvalidState {
                operation: "pause",
                status: case.status,
            }),
            CaseStatus::Paused => Ok(()),
            CaseStatus::Active => {
                case.status = CaseStatus::Paused;
                case.pause_reason = Some(reason);
                self.repository.update(case)?;
                info!(case_id = %id, "escalation paused");
                Ok(())
            }
        }
    }

    /// Restore due-action evaluation. The stored timestamps were never
    /// recomputed, so the due set is exactly what it was before the pause.
    pub fn resume(&self, id: &CaseId) -> Result<(), SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let mut case = self.fetch_case(id)?;
        match case.status {
            CaseStatus::Resolved => Err(SchedulerError::InvalidState {
                operation: "resume",
                status: case.status,
            }),
            CaseStatus::Active => Ok(()),
            CaseStatus::Paused => {
                case.status = CaseStatus::Active;
                case.pause_reason = None;
                self.repository.update(case)?;
                info!(case_id = %id, "escalation resumed");
                Ok(())
            }
        }
    }

    /// Terminal transition. Computes the savings achieved and the elapsed
    /// campaign length; any mutation afterwards is an invalid-state error.
    pub fn resolve(
        &self,
        id: &CaseId,
        final_amount: i64,
        resolution: ResolutionKind,
        resolved_at: DateTime<Utc>,
    ) -> Result<ResolutionSummary, SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let mut case = self.fetch_case(id)?;
        if case.status == CaseStatus::Resolved {
            return Err(SchedulerError::InvalidState {
                operation: "resolve",
                status: case.status,
            });
        }

        case.status = CaseStatus::Resolved;
        case.pause_reason = None;
        case.settlement_offered = Some(final_amount);
        case.settlement_accepted = true;

        let total_savings = case.billed_amount - final_amount;
        let savings_percentage = if case.billed_amount > 0 {
            round_tenth(total_savings as f64 / case.billed_amount as f64 * 100.0)
        } else {
            0.0
        };
        let summary = ResolutionSummary {
            case_id: id.clone(),
            resolution,
            original_bill: case.billed_amount,
            final_amount,
            total_savings,
            savings_percentage,
            stage_reached: case.furthest_stage(),
            days_to_resolution: (resolved_at - case.opened_at).num_days(),
        };

        self.repository.update(case)?;
        info!(
            case_id = %id,
            resolution = resolution.label(),
            savings = total_savings,
            "dispute case resolved"
        );
        Ok(summary)
    }

    /// Read-only snapshot for display: progress, next pending action, and the
    /// full timeline.
    pub fn status(&self, id: &CaseId, now: DateTime<Utc>) -> Result<CaseStatusView, SchedulerError> {
        let guard = self.case_guard(id);
        let _held = guard.lock().expect("case guard poisoned");

        let case = self.fetch_case(id)?;
        Ok(CaseStatusView::of(&case, now))
    }
}

/// Error raised by the escalation scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("case {0} not found")]
    NotFound(CaseId),
    #[error("case {case_id} has no {} action", .stage.label())]
    ActionNotFound {
        case_id: CaseId,
        stage: EscalationStage,
    },
    #[error("{operation} is not allowed while the case is {status}")]
    InvalidState {
        operation: &'static str,
        status: CaseStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionAck {
    pub case_id: CaseId,
    pub stage: EscalationStage,
    pub executed_at: DateTime<Utc>,
    pub already_executed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementRecommendation {
    Accept,
    Negotiate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementAssessment {
    pub offered: i64,
    pub target_amount: i64,
    pub max_acceptable: i64,
    pub recommendation: SettlementRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseAck {
    pub case_id: CaseId,
    pub responses_received: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementAssessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionSummary {
    pub case_id: CaseId,
    pub resolution: ResolutionKind,
    pub original_bill: i64,
    pub final_amount: i64,
    pub total_savings: i64,
    pub savings_percentage: f64,
    pub stage_reached: Option<EscalationStage>,
    pub days_to_resolution: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub executed: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextActionView {
    pub stage: EscalationStage,
    pub scheduled_at: DateTime<Utc>,
    pub days_until: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntryView {
    pub stage: EscalationStage,
    pub scheduled_at: DateTime<Utc>,
    pub executed: bool,
    pub executed_at: Option<DateTime<Utc>>,
    pub response_received: bool,
}

/// Sanitized case snapshot exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseStatusView {
    pub case_id: CaseId,
    pub status: &'static str,
    pub opened_at: DateTime<Utc>,
    pub counterparty: String,
    pub item: String,
    pub billed_amount: i64,
    pub fair_amount: i64,
    pub overcharge_percentage: f64,
    pub furthest_stage: Option<EscalationStage>,
    pub progress: ProgressView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextActionView>,
    pub responses_received: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_offered: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    pub timeline: Vec<TimelineEntryView>,
}

impl CaseStatusView {
    pub fn of(case: &DisputeCase, now: DateTime<Utc>) -> Self {
        let executed = case.executed_count();
        let total = case.actions.len();
        let percentage = if total > 0 {
            round_tenth(executed as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        let next_action = case.next_pending().map(|action: &ScheduledAction| {
            NextActionView {
                stage: action.stage,
                scheduled_at: action.scheduled_at,
                days_until: (action.scheduled_at - now).num_days(),
            }
        });

        Self {
            case_id: case.id.clone(),
            status: case.status.label(),
            opened_at: case.opened_at,
            counterparty: case.counterparty.name.clone(),
            item: case.item.clone(),
            billed_amount: case.billed_amount,
            fair_amount: case.fair_amount,
            overcharge_percentage: case.overcharge_percentage,
            furthest_stage: case.furthest_stage(),
            progress: ProgressView {
                executed,
                total,
                percentage,
            },
            next_action,
            responses_received: case.responses_received,
            settlement_offered: case.settlement_offered,
            pause_reason: case.pause_reason.clone(),
            timeline: case
                .actions
                .iter()
                .map(|action| TimelineEntryView {
                    stage: action.stage,
                    scheduled_at: action.scheduled_at,
                    executed: action.executed,
                    executed_at: action.executed_at,
                    response_received: action.response_received,
                })
                .collect(),
        }
    }
}
