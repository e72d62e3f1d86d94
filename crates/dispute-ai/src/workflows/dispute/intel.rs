use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the reference directory knows about a counterparty that is
/// useful for pressure: regulatory posture, complaint record, settlement
/// behavior, and charity obligations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterpartyProfile {
    pub name: String,
    pub jurisdiction: String,
    /// Already honors the public reference rate for an empanelled population.
    pub rate_program_empanelled: bool,
    /// Empanelled under the subsidized-care insurance scheme.
    pub subsidy_program_empanelled: bool,
    pub charitable_trust: bool,
    pub charity_policy: bool,
    /// Annual income ceiling for free or subsidized care, where disclosed.
    pub charity_income_threshold: Option<i64>,
    /// Reserved-capacity mandate, e.g. "20% reserved for low-income claimants".
    pub set_aside_quota: Option<String>,
    pub accredited: bool,
    pub accreditation_valid_until: Option<NaiveDate>,
    pub complaints_last_year: u32,
    pub regulator_complaints: u32,
    pub recent_violations: Vec<String>,
    /// Historical average discount conceded in settled disputes, percent.
    pub average_settlement_discount: f64,
}

impl CounterpartyProfile {
    /// High complaint volume makes the counterparty responsive to publicity.
    pub fn pr_sensitive(&self) -> bool {
        self.complaints_last_year > 30
    }

    /// Score how exposed this counterparty is to regulatory and reputational
    /// pressure, independent of any particular bill.
    pub fn vulnerability(&self) -> VulnerabilityAssessment {
        let mut score = 0u32;
        let mut findings = Vec::new();

        if self.complaints_last_year > 50 {
            score += 30;
            findings.push(
                "High consumer complaint volume - sensitive to reputation damage".to_string(),
            );
        }

        if self.regulator_complaints > 5 {
            score += 20;
            findings
                .push("Multiple regulator complaints - regulatory scrutiny likely".to_string());
        }

        if self.charitable_trust {
            score += 25;
            findings.push(
                "Charitable trust - must provide subsidized care to keep tax status".to_string(),
            );
        }

        if !self.recent_violations.is_empty() {
            score += 25;
            findings.push(format!(
                "Recent violations: {}",
                self.recent_violations.join(", ")
            ));
        }

        if self.accredited {
            score += 10;
            findings.push(
                "Accredited - bound by published standards, complaints go to the accreditor"
                    .to_string(),
            );
        }

        if self.rate_program_empanelled {
            score += 15;
            findings.push(
                "Reference-rate empanelled - already accepts the lower rate for the same services"
                    .to_string(),
            );
        }

        let score = score.min(100);
        let level = if score > 60 {
            VulnerabilityLevel::High
        } else if score > 30 {
            VulnerabilityLevel::Medium
        } else {
            VulnerabilityLevel::Low
        };

        VulnerabilityAssessment {
            score,
            level,
            findings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityLevel {
    Low,
    Medium,
    High,
}

impl VulnerabilityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Derived view of a counterparty's exposure, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerabilityAssessment {
    pub score: u32,
    pub level: VulnerabilityLevel,
    pub findings: Vec<String>,
}

/// Boundary to the external reference-data service: authoritative rates and
/// counterparty profiles. The core consumes this, it never implements it.
pub trait RateAndProfileLookup: Send + Sync {
    fn reference_rate(&self, item: &str, jurisdiction: &str) -> Result<Option<i64>, LookupError>;

    fn counterparty_profile(
        &self,
        name: &str,
        jurisdiction: &str,
    ) -> Result<Option<CounterpartyProfile>, LookupError>;
}

/// Reference directory failure.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("reference directory unavailable: {0}")]
    Unavailable(String),
}
