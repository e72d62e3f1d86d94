use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use dispute_ai::workflows::dispute::{
    ActionDetails, ActionDispatcher, CaseId, CaseRepository, CaseStatus, CounterpartyProfile,
    DisputeCase, DispatchError, DispatchOutcome, DueAction, LeverageConfig, LookupError,
    RateAndProfileLookup, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared context for the stateless analysis endpoint.
#[derive(Clone)]
pub(crate) struct AnalysisContext {
    pub(crate) lookup: Arc<dyn RateAndProfileLookup>,
    pub(crate) leverage: LeverageConfig,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    cases: Arc<Mutex<HashMap<CaseId, DisputeCase>>>,
}

impl CaseRepository for InMemoryCaseRepository {
    fn insert(&self, case: DisputeCase) -> Result<DisputeCase, RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        if guard.contains_key(&case.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn update(&self, case: DisputeCase) -> Result<(), RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        if guard.contains_key(&case.id) {
            guard.insert(case.id.clone(), case);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<DisputeCase>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_cases(&self) -> Result<Vec<CaseId>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|case| case.status == CaseStatus::Active)
            .map(|case| case.id.clone())
            .collect())
    }
}

/// Dispatcher that narrates what the real transports would do. Production
/// deployments swap in adapters for mail, filing portals, and social posts.
#[derive(Default, Clone)]
pub(crate) struct TracingDispatcher {
    executed: Arc<Mutex<Vec<(CaseId, String)>>>,
}

impl TracingDispatcher {
    pub(crate) fn executed(&self) -> Vec<(CaseId, String)> {
        self.executed.lock().expect("dispatch log poisoned").clone()
    }
}

impl ActionDispatcher for TracingDispatcher {
    fn execute(&self, action: &DueAction) -> Result<DispatchOutcome, DispatchError> {
        let summary = match &action.details {
            ActionDetails::EmailPrimary { recipient, subject, .. }
            | ActionDetails::EmailEscalated { recipient, subject, .. }
            | ActionDetails::FormalGrievance { recipient, subject, .. } => {
                format!("email '{subject}' queued for {recipient}")
            }
            ActionDetails::FormalComplaintFiling { portal, filing_type, .. }
            | ActionDetails::InformationRequest { portal, filing_type, .. } => {
                format!("{filing_type} prepared for the {portal}")
            }
            ActionDetails::CentralGrievance { portal, authority, .. } => {
                format!("grievance addressed to the {authority} via the {portal}")
            }
            ActionDetails::MediaAlert { hashtags, .. } => {
                format!("journalist pitch drafted ({})", hashtags.join(", "))
            }
            ActionDetails::PublicPressure { platforms, .. } => {
                format!("public post drafted for {}", platforms.join(" and "))
            }
        };

        info!(
            case_id = %action.case.case_id,
            stage = action.stage.label(),
            "{summary}"
        );
        self.executed
            .lock()
            .expect("dispatch log poisoned")
            .push((action.case.case_id.clone(), summary.clone()));
        Ok(DispatchOutcome { summary })
    }
}

struct DirectoryEntry {
    profile: CounterpartyProfile,
    rates: &'static [(&'static str, i64)],
}

/// Seeded reference directory standing in for the external rate and profile
/// service during demos and tests.
pub(crate) struct StaticDirectoryLookup {
    entries: Vec<DirectoryEntry>,
}

impl StaticDirectoryLookup {
    pub(crate) fn seeded() -> Self {
        let entries = vec![
            DirectoryEntry {
                profile: CounterpartyProfile {
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
                },
                rates: &[
                    ("orthopedic implant package", 120_000),
                    ("cardiac stent procedure", 95_000),
                    ("inpatient ward day", 2_500),
                ],
            },
            DirectoryEntry {
                profile: CounterpartyProfile {
                    name: "Meridian General Hospital".to_string(),
                    jurisdiction: "Westmark".to_string(),
                    rate_program_empanelled: true,
                    subsidy_program_empanelled: true,
                    charitable_trust: false,
                    charity_policy: false,
                    charity_income_threshold: None,
                    set_aside_quota: Some("10% per jurisdiction mandate".to_string()),
                    accredited: true,
                    accreditation_valid_until: None,
                    complaints_last_year: 67,
                    regulator_complaints: 8,
                    recent_violations: vec!["Drug pricing violation".to_string()],
                    average_settlement_discount: 45.0,
                },
                rates: &[
                    ("orthopedic implant package", 118_000),
                    ("diagnostic imaging series", 8_000),
                ],
            },
            DirectoryEntry {
                profile: CounterpartyProfile {
                    name: "Cedar Grove Clinic".to_string(),
                    jurisdiction: "Northvale".to_string(),
                    rate_program_empanelled: false,
                    subsidy_program_empanelled: false,
                    charitable_trust: false,
                    charity_policy: false,
                    charity_income_threshold: None,
                    set_aside_quota: None,
                    accredited: false,
                    accreditation_valid_until: None,
                    complaints_last_year: 6,
                    regulator_complaints: 0,
                    recent_violations: Vec::new(),
                    average_settlement_discount: 30.0,
                },
                rates: &[("diagnostic imaging series", 6_500)],
            },
        ];

        Self { entries }
    }

    /// Unlisted counterparties still get an analysis, on conservative numbers.
    pub(crate) fn fallback_profile(name: &str, jurisdiction: &str) -> CounterpartyProfile {
        CounterpartyProfile {
            name: name.to_string(),
            jurisdiction: jurisdiction.to_string(),
            rate_program_empanelled: false,
            subsidy_program_empanelled: false,
            charitable_trust: false,
            charity_policy: false,
            charity_income_threshold: None,
            set_aside_quota: None,
            accredited: false,
            accreditation_valid_until: None,
            complaints_last_year: 0,
            regulator_complaints: 0,
            recent_violations: Vec::new(),
            average_settlement_discount: 30.0,
        }
    }
}

impl RateAndProfileLookup for StaticDirectoryLookup {
    fn reference_rate(&self, item: &str, jurisdiction: &str) -> Result<Option<i64>, LookupError> {
        let item = item.trim().to_ascii_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.profile.jurisdiction.eq_ignore_ascii_case(jurisdiction))
            .flat_map(|entry| entry.rates.iter())
            .find(|(listed, _)| item.contains(listed))
            .map(|(_, rate)| *rate))
    }

    fn counterparty_profile(
        &self,
        name: &str,
        jurisdiction: &str,
    ) -> Result<Option<CounterpartyProfile>, LookupError> {
        Ok(self
            .entries
            .iter()
            .find(|entry| {
                entry.profile.name.eq_ignore_ascii_case(name.trim())
                    && entry.profile.jurisdiction.eq_ignore_ascii_case(jurisdiction)
            })
            .map(|entry| entry.profile.clone()))
    }
}

pub(crate) fn default_leverage_config() -> LeverageConfig {
    LeverageConfig::default()
}
