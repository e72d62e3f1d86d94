mod repository;
mod service;

pub use repository::{
    ActionDispatcher, CaseRepository, DispatchError, DispatchOutcome, RepositoryError,
};
pub use service::{
    CaseStatusView, EscalationScheduler, ExecutionAck, NextActionView, ProgressView, ResolutionSummary,
    ResponseAck, SchedulerError, SettlementAssessment, SettlementRecommendation, TimelineEntryView,
};
