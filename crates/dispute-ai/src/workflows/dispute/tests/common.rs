use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use super::super::domain::{CaseId, CaseStatus, CounterpartyRef, DisputeCase, DisputeFiling};
use super::super::intel::CounterpartyProfile;
use super::super::scheduler::{CaseRepository, EscalationScheduler, RepositoryError};

pub(super) fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn opened_at() -> DateTime<Utc> {
    ts(2025, 3, 1, 9)
}

/// The canonical scenario: billed 350000 against a 120000 reference.
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

/// Charitable trust with a complaint record: the strong-leverage profile.
pub(super) fn charitable_profile() -> CounterpartyProfile {
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

/// No regulatory hooks, no complaint record: the weak-leverage profile.
pub(super) fn plain_profile() -> CounterpartyProfile {
    CounterpartyProfile {
        name: "Meridian Diagnostics".to_string(),
        jurisdiction: "Westmark".to_string(),
        rate_program_empanelled: false,
        subsidy_program_empanelled: false,
        charitable_trust: false,
        charity_policy: false,
        charity_income_threshold: None,
        set_aside_quota: None,
        accredited: false,
        accreditation_valid_until: None,
        complaints_last_year: 5,
        regulator_complaints: 0,
        recent_violations: Vec::new(),
        average_settlement_discount: 30.0,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCaseRepository {
    cases: Arc<Mutex<HashMap<CaseId, DisputeCase>>>,
}

impl CaseRepository for MemoryCaseRepository {
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
        if guard.contains_key(&case.id) {
            guard.insert(case.id.clone(), case);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
    EscalationScheduler<MemoryCaseRepository>,
    Arc<MemoryCaseRepository>,
) {
    let repository = Arc::new(MemoryCaseRepository::default());
    let scheduler = EscalationScheduler::new(repository.clone());
    (scheduler, repository)
}
