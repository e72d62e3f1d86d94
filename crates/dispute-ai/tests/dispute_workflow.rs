//! Integration specifications for the dispute escalation workflow.
//!
//! Scenarios exercise the public scheduler facade and the HTTP router
//! end-to-end, without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use dispute_ai::workflows::dispute::{
        CaseId, CaseRepository, CaseStatus, CounterpartyProfile, CounterpartyRef, DisputeCase,
        DisputeFiling, EscalationScheduler, RepositoryError,
    };

    pub(super) fn opened_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn filing() -> DisputeFiling {
        DisputeFiling {
            counterparty: CounterpartyRef {
                name: "Lakeside Memorial Care".to_string(),
                jurisdiction: "Westmark".to_string(),
            },
            item: "orthopedic implant package".to_string(),
            billed_amount: 350_000,
            fair_amount: 120_000,
            claimant_name: Some("R. Varga".to_string()),
            claimant_email: Some("r.varga@example.net".to_string()),
            counterparty_email: Some("billing@lakeside.example".to_string()),
            declared_annual_income: Some(250_000),
        }
    }

    pub(super) fn profile() -> CounterpartyProfile {
        CounterpartyProfile {
            name: "Lakeside Memorial Care".to_string(),
            jurisdiction: "Westmark".to_string(),
            rate_program_empanelled: true,
            subsidy_program_empanelled: false,
            charitable_trust: true,
            charity_policy: true,
            charity_income_threshold: Some(300_000),
            set_aside_quota: Some("20% reserved for low-income claimants".to_string()),
            accredited: true,
            accreditation_valid_until: None,
            complaints_last_year: 34,
            regulator_complaints: 5,
            recent_violations: vec!["Price display violation".to_string()],
            average_settlement_discount: 40.0,
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        cases: Arc<Mutex<HashMap<CaseId, DisputeCase>>>,
    }

    impl CaseRepository for MemoryRepository {
        fn insert(&self, case: DisputeCase) -> Result<DisputeCase, RepositoryError> {
            let mut guard = self.cases.lock().expect("lock");
            if guard.contains_key(&case.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(case.id.clone(), case.clone());
            Ok(case)
        }

        fn update(&self, case: DisputeCase) -> Result<(), RepositoryError> {
            let mut guard = self.cases.lock().expect("lock");
            guard.insert(case.id.clone(), case);
            Ok(())
        }

        fn fetch(&self, id: &CaseId) -> Result<Option<DisputeCase>, RepositoryError> {
            let guard = self.cases.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn active_cases(&self) -> Result<Vec<CaseId>, RepositoryError> {
            let guard = self.cases.lock().expect("lock");
            Ok(guard
                .values()
                .filter(|case| case.status == CaseStatus::Active)
                .map(|case| case.id.clone())
                .collect())
        }
    }

    pub(super) fn build_scheduler() -> (
        Arc<EscalationScheduler<MemoryRepository>>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let scheduler = Arc::new(EscalationScheduler::new(repository.clone()));
        (scheduler, repository)
    }
}

mod lifecycle {
    use super::common::*;
    use chrono::Duration;
    use dispute_ai::workflows::dispute::{
        CaseRepository, EscalationStage, ResolutionKind, SchedulerError, SettlementRecommendation,
    };

    #[test]
    fn campaign_runs_from_open_to_resolution() {
        let (scheduler, repository) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");

        // Drive the first week of the campaign the way the poller would.
        let mut executed = Vec::new();
        for day in 1..=7 {
            let now = opened_at() + Duration::days(day);
            for action in scheduler.due_actions(&case.id, now).expect("due") {
                let ack = scheduler
                    .mark_executed(&case.id, action.stage, now)
                    .expect("record execution");
                assert!(!ack.already_executed);
                executed.push(action.stage);
            }
        }
        assert_eq!(
            executed,
            vec![
                EscalationStage::EmailPrimary,
                EscalationStage::EmailEscalated,
                EscalationStage::FormalGrievance,
                EscalationStage::FormalComplaintFiling,
            ]
        );

        // The counterparty blinks after the forum filing.
        let response_at = opened_at() + Duration::days(8);
        let ack = scheduler
            .record_response(
                &case.id,
                "Revised offer after internal review".to_string(),
                Some(140_000),
                response_at,
            )
            .expect("respond");
        assert_eq!(
            ack.settlement.expect("assessed").recommendation,
            SettlementRecommendation::Accept
        );

        let summary = scheduler
            .resolve(
                &case.id,
                140_000,
                ResolutionKind::Negotiated,
                opened_at() + Duration::days(9),
            )
            .expect("resolve");
        assert_eq!(summary.total_savings, 210_000);
        assert_eq!(summary.savings_percentage, 60.0);
        assert_eq!(
            summary.stage_reached,
            Some(EscalationStage::FormalComplaintFiling)
        );

        let stored = repository
            .fetch(&case.id)
            .expect("fetch")
            .expect("case present");
        assert!(stored.settlement_accepted);
        assert!(repository.active_cases().expect("active").is_empty());

        let late = scheduler.resolve(
            &case.id,
            100_000,
            ResolutionKind::Negotiated,
            opened_at() + Duration::days(10),
        );
        assert!(matches!(late, Err(SchedulerError::InvalidState { .. })));
    }

    #[test]
    fn pause_freezes_the_campaign_without_losing_the_schedule() {
        let (scheduler, _) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");
        let day21 = opened_at() + Duration::days(21);

        let before = scheduler.due_actions(&case.id, day21).expect("due");
        scheduler
            .pause(&case.id, "active negotiation".to_string())
            .expect("pause");
        assert!(scheduler
            .due_actions(&case.id, day21)
            .expect("due")
            .is_empty());

        scheduler.resume(&case.id).expect("resume");
        let after = scheduler.due_actions(&case.id, day21).expect("due");
        assert_eq!(before, after);
    }
}

mod analysis {
    use super::common::*;
    use dispute_ai::workflows::dispute::{
        DisputeAnalysis, LeverageConfig, LeverageTier, StrategyKind,
    };

    #[test]
    fn composite_analysis_ties_the_engines_together() {
        let analysis = DisputeAnalysis::build(
            350_000,
            120_000,
            &profile(),
            Some(250_000),
            &LeverageConfig::default(),
        );

        assert_eq!(analysis.leverage.tier, LeverageTier::Maximum);
        assert_eq!(
            analysis.plan.primary().strategy.kind,
            StrategyKind::CharityCare
        );
        assert!(analysis.prediction.success_probability >= 85.0);
        assert!(analysis.recommendation.starts_with("Start with"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use dispute_ai::workflows::dispute::dispute_router;

    fn build_router() -> axum::Router {
        let (scheduler, _) = build_scheduler();
        dispute_router(scheduler)
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn post_disputes_creates_a_case_with_a_full_timeline() {
        let router = build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/disputes")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&filing()).expect("serialize filing"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let payload = read_json(response).await;
        assert_eq!(payload.get("status"), Some(&json!("active")));
        assert_eq!(
            payload
                .get("timeline")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(8)
        );
        assert!(payload.get("case_id").is_some());
    }

    #[tokio::test]
    async fn unknown_case_returns_not_found() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/disputes/0000DEADBEEF")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = read_json(response).await;
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("not found"));
    }

    #[tokio::test]
    async fn resolve_twice_returns_conflict() {
        let (scheduler, _) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");
        let router = dispute_router(scheduler);

        let resolve = |router: axum::Router| {
            let uri = format!("/api/v1/disputes/{}/resolve", case.id.0);
            async move {
                router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri(uri)
                            .header("content-type", "application/json")
                            .body(Body::from(
                                serde_json::to_vec(
                                    &json!({ "final_amount": 200_000, "resolution": "negotiated" }),
                                )
                                .expect("serialize"),
                            ))
                            .expect("request"),
                    )
                    .await
                    .expect("dispatch")
            }
        };

        let first = resolve(router.clone()).await;
        assert_eq!(first.status(), StatusCode::OK);
        let payload = read_json(first).await;
        assert_eq!(payload.get("total_savings"), Some(&json!(150_000)));

        let second = resolve(router).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_stage_label_is_rejected() {
        let (scheduler, _) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");
        let router = dispute_router(scheduler);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!(
                        "/api/v1/disputes/{}/actions/carrier_pigeon/executed",
                        case.id.0
                    ))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn execution_and_responses_flow_through_the_http_surface() {
        let (scheduler, _) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");
        let router = dispute_router(scheduler);

        let executed = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!(
                        "/api/v1/disputes/{}/actions/email_primary/executed",
                        case.id.0
                    ))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(executed.status(), StatusCode::OK);
        let ack = read_json(executed).await;
        assert_eq!(ack.get("already_executed"), Some(&json!(false)));

        let responded = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/disputes/{}/responses", case.id.0))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({
                            "content": "Offer enclosed",
                            "settlement_offered": 140_000,
                        }))
                        .expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(responded.status(), StatusCode::OK);
        let ack = read_json(responded).await;
        assert_eq!(ack.get("responses_received"), Some(&json!(1)));
        assert_eq!(
            ack.pointer("/settlement/recommendation"),
            Some(&json!("accept"))
        );

        let status = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/disputes/{}", case.id.0))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let payload = read_json(status).await;
        assert_eq!(payload.pointer("/progress/executed"), Some(&json!(1)));
        assert_eq!(payload.get("responses_received"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn due_actions_respect_the_as_of_parameter() {
        let (scheduler, _) = build_scheduler();
        let case = scheduler.open_case(filing(), opened_at()).expect("open");
        let router = dispute_router(scheduler);

        let as_of = (opened_at() + chrono::Duration::days(5))
            .to_rfc3339()
            .replace('+', "%2B");
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/api/v1/disputes/{}/actions/due?as_of={as_of}",
                        case.id.0
                    ))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let actions = payload.as_array().expect("array");
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].get("stage"), Some(&json!("email_primary")));
    }
}
