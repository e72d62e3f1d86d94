use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use dispute_ai::workflows::dispute::{
    ActionDispatcher, CaseRepository, EscalationScheduler,
};

/// Recurring poller that turns due actions into real-world dispatches.
///
/// Dispatch failures are logged and the action stays due, so the next tick
/// retries it; the dispatcher is responsible for being idempotent per action.
pub(crate) async fn run<R, D>(
    repository: Arc<R>,
    scheduler: Arc<EscalationScheduler<R>>,
    dispatcher: Arc<D>,
    poll_interval: Duration,
) where
    R: CaseRepository + 'static,
    D: ActionDispatcher + 'static,
{
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        poll_once(&repository, &scheduler, dispatcher.as_ref(), Utc::now());
    }
}

/// One pass over every active case. Extracted from the loop so tests can
/// drive it with a pinned clock.
pub(crate) fn poll_once<R, D>(
    repository: &Arc<R>,
    scheduler: &EscalationScheduler<R>,
    dispatcher: &D,
    now: DateTime<Utc>,
) where
    R: CaseRepository,
    D: ActionDispatcher + ?Sized,
{
    let case_ids = match repository.active_cases() {
        Ok(ids) => ids,
        Err(error) => {
            warn!(%error, "escalation driver could not enumerate active cases");
            return;
        }
    };

    for case_id in case_ids {
        let due = match scheduler.due_actions(&case_id, now) {
            Ok(due) => due,
            Err(error) => {
                warn!(%case_id, %error, "skipping case in this poll");
                continue;
            }
        };

        if due.is_empty() {
            debug!(%case_id, "no actions due");
            continue;
        }

        for action in due {
            match dispatcher.execute(&action) {
                Ok(outcome) => {
                    if let Err(error) = scheduler.mark_executed(&case_id, action.stage, now) {
                        warn!(
                            %case_id,
                            stage = action.stage.label(),
                            %error,
                            "dispatched but could not record execution"
                        );
                    } else {
                        debug!(
                            %case_id,
                            stage = action.stage.label(),
                            summary = %outcome.summary,
                            "escalation action dispatched"
                        );
                    }
                }
                Err(error) => {
                    warn!(
                        %case_id,
                        stage = action.stage.label(),
                        %error,
                        "dispatch failed; action stays due for the next poll"
                    );
                }
            }
        }
    }
}
