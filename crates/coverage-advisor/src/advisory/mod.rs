//! Questionnaire facts, the coverage recommendation engine, and the session
//! service exposing both over HTTP.

pub mod facts;
pub mod recommendation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use facts::{normalize_facts, FactsRecord, FactsWarning, NormalizedFacts, SessionId};
pub use recommendation::{
    assemble, evaluate_dm, evaluate_rc, generate_coverage_recommendation, generate_product_tiers,
    render_recommendation, Coverage, InsuranceLine, LiabilityLimits, ProductTier,
    PropertyDamageCoverages, Recommendation, UnknownLine,
};
pub use repository::{
    FactsRepository, NotificationError, NotificationSink, RenderedDocument, RepositoryError,
    StoredFacts, StoredFactsView,
};
pub use router::advisory_router;
pub use service::{AdvisoryService, AdvisoryServiceError, DispatchReceipt};
