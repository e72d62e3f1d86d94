//! Dispute orchestration core: leverage scoring, strategy selection, outcome
//! forecasting, and the time-driven escalation scheduler that paces a
//! pressure campaign against a counterparty.

pub mod analysis;
pub mod domain;
pub mod intel;
pub mod leverage;
pub mod prediction;
pub mod router;
pub mod scheduler;
pub mod strategy;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use analysis::DisputeAnalysis;
pub use domain::{
    CaseId, CaseStatus, CounterpartyRef, DisputeCase, DisputeFiling, EscalationStage,
    OverchargeSeverity, PriceComparison, ResolutionKind, ScheduledAction,
};
pub use intel::{
    CounterpartyProfile, LookupError, RateAndProfileLookup, VulnerabilityAssessment,
    VulnerabilityLevel,
};
pub use leverage::{
    LeverageCategory, LeverageConfig, LeverageEngine, LeveragePoint, LeverageReport,
    LeverageSeverity, LeverageTier,
};
pub use prediction::{predict_outcome, Prediction, PredictionConfidence};
pub use router::dispute_router;
pub use scheduler::{
    ActionDispatcher, CaseRepository, CaseStatusView, DispatchError, DispatchOutcome,
    EscalationScheduler, ExecutionAck, RepositoryError, ResolutionSummary, ResponseAck,
    SchedulerError, SettlementRecommendation,
};
pub use strategy::{
    definition, select_strategies, EffortLevel, SelectedStrategy, StrategyDefinition, StrategyKind,
    StrategyPlan,
};
pub use timeline::{action_details, build_schedule, ActionDetails, CaseSummary, DueAction};
