use super::super::domain::{CaseId, DisputeCase};
use super::super::timeline::DueAction;

/// Storage abstraction keyed by case identifier, so the scheduler can be
/// exercised against an in-memory map in tests and a durable backend in
/// production without touching its logic.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, case: DisputeCase) -> Result<DisputeCase, RepositoryError>;
    fn update(&self, case: DisputeCase) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<DisputeCase>, RepositoryError>;
    /// Identifiers of every case still in the active status, for the driver.
    fn active_cases(&self) -> Result<Vec<CaseId>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case already exists")]
    Conflict,
    #[error("case not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound boundary that performs the real-world side effect for one due
/// action (send the email, file the complaint, post publicly).
///
/// An `Err` means the action was not executed; the scheduler leaves it due
/// for a future poll, so implementations must be idempotent per action.
pub trait ActionDispatcher: Send + Sync {
    fn execute(&self, action: &DueAction) -> Result<DispatchOutcome, DispatchError>;
}

/// What the dispatcher reports back after a successful side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub summary: String,
}

/// Dispatch failure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch transport unavailable: {0}")]
    Transport(String),
    #[error("dispatch rejected: {0}")]
    Rejected(String),
}
