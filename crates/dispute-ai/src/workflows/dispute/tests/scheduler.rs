use chrono::Duration;

use super::super::domain::{CaseStatus, EscalationStage, ResolutionKind};
use super::super::scheduler::{SchedulerError, SettlementRecommendation};
use super::common::*;

#[test]
fn timeline_covers_every_stage_with_strictly_increasing_offsets() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    assert_eq!(case.actions.len(), EscalationStage::ordered().len());
    for (action, stage) in case.actions.iter().zip(EscalationStage::ordered()) {
        assert_eq!(action.stage, stage);
        assert_eq!(
            action.scheduled_at,
            opened_at() + Duration::days(stage.day_offset())
        );
        assert!(!action.executed);
        assert!(!action.response_received);
    }
    for pair in case.actions.windows(2) {
        assert!(pair[0].scheduled_at < pair[1].scheduled_at);
    }
}

#[test]
fn case_id_is_deterministic_for_identical_inputs() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    assert_eq!(case.id.0.len(), 12);
    assert_eq!(
        super::super::domain::DisputeCase::derive_id(&filing(), opened_at()),
        case.id
    );
}

#[test]
fn zero_fair_amount_degrades_to_zero_overcharge() {
    let (scheduler, _) = build_scheduler();
    let mut degenerate = filing();
    degenerate.fair_amount = 0;

    let case = scheduler.open_case(degenerate, opened_at()).expect("open");
    assert_eq!(case.overcharge_percentage, 0.0);
}

#[test]
fn due_actions_track_elapsed_schedule_and_poll_idempotently() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    assert!(scheduler
        .due_actions(&case.id, opened_at())
        .expect("due")
        .is_empty());

    let day3 = opened_at() + Duration::days(3);
    let first_poll = scheduler.due_actions(&case.id, day3).expect("due");
    let second_poll = scheduler.due_actions(&case.id, day3).expect("due");
    assert_eq!(
        first_poll.iter().map(|a| a.stage).collect::<Vec<_>>(),
        vec![EscalationStage::EmailPrimary, EscalationStage::EmailEscalated]
    );
    assert_eq!(first_poll, second_poll);
    assert_eq!(first_poll[0].case.case_id, case.id);
}

#[test]
fn mark_executed_removes_from_due_set_and_is_idempotent() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");
    let day1 = opened_at() + Duration::days(1);

    let first = scheduler
        .mark_executed(&case.id, EscalationStage::EmailPrimary, day1)
        .expect("mark");
    assert!(!first.already_executed);

    assert!(scheduler.due_actions(&case.id, day1).expect("due").is_empty());

    let later = day1 + Duration::hours(6);
    let second = scheduler
        .mark_executed(&case.id, EscalationStage::EmailPrimary, later)
        .expect("mark again");
    assert!(second.already_executed);
    assert_eq!(second.executed_at, first.executed_at);
}

#[test]
fn paused_case_yields_no_due_actions_and_resume_restores_them() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");
    let day10 = opened_at() + Duration::days(10);

    let before = scheduler.due_actions(&case.id, day10).expect("due");
    assert_eq!(before.len(), 5);

    scheduler
        .pause(&case.id, "active negotiation".to_string())
        .expect("pause");
    assert!(scheduler
        .due_actions(&case.id, day10)
        .expect("due")
        .is_empty());

    let view = scheduler.status(&case.id, day10).expect("status");
    assert_eq!(view.status, CaseStatus::Paused.label());
    assert_eq!(view.pause_reason.as_deref(), Some("active negotiation"));

    scheduler.resume(&case.id).expect("resume");
    let after = scheduler.due_actions(&case.id, day10).expect("due");
    assert_eq!(before, after);
}

#[test]
fn response_suppresses_only_the_next_unexecuted_action() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");
    let day1 = opened_at() + Duration::days(1);

    scheduler
        .mark_executed(&case.id, EscalationStage::EmailPrimary, day1)
        .expect("mark");
    scheduler
        .record_response(
            &case.id,
            "We are reviewing your bill".to_string(),
            None,
            day1 + Duration::hours(4),
        )
        .expect("respond");

    // The escalated email was satisfied by the reply; the grievance still fires.
    let day3 = opened_at() + Duration::days(3);
    assert!(scheduler.due_actions(&case.id, day3).expect("due").is_empty());

    let day5 = opened_at() + Duration::days(5);
    let due = scheduler.due_actions(&case.id, day5).expect("due");
    assert_eq!(
        due.iter().map(|a| a.stage).collect::<Vec<_>>(),
        vec![EscalationStage::FormalGrievance]
    );
}

#[test]
fn settlement_at_or_below_margin_is_recommended_for_acceptance() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    let ack = scheduler
        .record_response(
            &case.id,
            "Offer enclosed".to_string(),
            Some(140_000),
            opened_at() + Duration::days(2),
        )
        .expect("respond");
    let settlement = ack.settlement.expect("assessed");
    assert_eq!(settlement.max_acceptable, 144_000);
    assert_eq!(settlement.recommendation, SettlementRecommendation::Accept);
}

#[test]
fn settlement_above_margin_is_recommended_for_negotiation() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    let ack = scheduler
        .record_response(
            &case.id,
            "Best and final".to_string(),
            Some(220_000),
            opened_at() + Duration::days(2),
        )
        .expect("respond");
    let settlement = ack.settlement.expect("assessed");
    assert_eq!(
        settlement.recommendation,
        SettlementRecommendation::Negotiate
    );
    assert_eq!(settlement.target_amount, 120_000);
}

#[test]
fn resolve_computes_savings_and_is_terminal() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");
    let day1 = opened_at() + Duration::days(1);
    scheduler
        .mark_executed(&case.id, EscalationStage::EmailPrimary, day1)
        .expect("mark");

    let resolved_at = opened_at() + Duration::days(12);
    let summary = scheduler
        .resolve(&case.id, 200_000, ResolutionKind::Negotiated, resolved_at)
        .expect("resolve");

    assert_eq!(summary.total_savings, 150_000);
    assert_eq!(summary.savings_percentage, 42.9);
    assert_eq!(summary.days_to_resolution, 12);
    assert_eq!(summary.stage_reached, Some(EscalationStage::EmailPrimary));

    let again = scheduler.resolve(
        &case.id,
        180_000,
        ResolutionKind::Negotiated,
        resolved_at + Duration::days(1),
    );
    assert!(matches!(again, Err(SchedulerError::InvalidState { .. })));

    let pause = scheduler.pause(&case.id, "late".to_string());
    assert!(matches!(pause, Err(SchedulerError::InvalidState { .. })));

    let respond = scheduler.record_response(
        &case.id,
        "too late".to_string(),
        None,
        resolved_at + Duration::days(1),
    );
    assert!(matches!(respond, Err(SchedulerError::InvalidState { .. })));

    assert!(scheduler
        .due_actions(&case.id, resolved_at + Duration::days(30))
        .expect("due")
        .is_empty());
}

#[test]
fn unknown_case_surfaces_not_found() {
    let (scheduler, _) = build_scheduler();
    let missing = super::super::domain::CaseId("0000DEADBEEF".to_string());

    assert!(matches!(
        scheduler.status(&missing, opened_at()),
        Err(SchedulerError::NotFound(_))
    ));
    assert!(matches!(
        scheduler.pause(&missing, "x".to_string()),
        Err(SchedulerError::NotFound(_))
    ));
}

#[test]
fn status_reports_progress_and_next_action() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");
    let day1 = opened_at() + Duration::days(1);
    scheduler
        .mark_executed(&case.id, EscalationStage::EmailPrimary, day1)
        .expect("mark");

    let view = scheduler.status(&case.id, day1).expect("status");
    assert_eq!(view.progress.executed, 1);
    assert_eq!(view.progress.total, 8);
    assert_eq!(view.progress.percentage, 12.5);
    assert_eq!(view.timeline.len(), 8);

    let next = view.next_action.expect("next pending");
    assert_eq!(next.stage, EscalationStage::EmailEscalated);
    assert_eq!(next.days_until, 2);
}

#[test]
fn case_state_round_trips_through_serde_without_timestamp_drift() {
    let (scheduler, _) = build_scheduler();
    let case = scheduler.open_case(filing(), opened_at()).expect("open");

    let json = serde_json::to_string(&case).expect("serialize");
    let restored: super::super::domain::DisputeCase =
        serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, case);
}
