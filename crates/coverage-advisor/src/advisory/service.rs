use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::AdvisorConfig;

use super::facts::{normalize_facts, FactsRecord, FactsWarning, NormalizedFacts, SessionId};
use super::recommendation::{
    generate_coverage_recommendation, generate_product_tiers, render_recommendation,
    InsuranceLine, ProductTier, Recommendation,
};
use super::repository::{
    FactsRepository, NotificationError, NotificationSink, RenderedDocument, RepositoryError,
    StoredFacts,
};

/// Service wiring the pure engine to the facts store and the notification sink.
pub struct AdvisoryService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    config: AdvisorConfig,
}

/// Outcome of a delivery attempt. Sink failures land here, not in the error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub session_id: SessionId,
    pub line: InsuranceLine,
    pub recipient: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<R, N> AdvisoryService<R, N>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, config: AdvisorConfig) -> Self {
        Self {
            repository,
            notifications,
            config,
        }
    }

    pub fn config(&self) -> AdvisorConfig {
        self.config
    }

    /// Normalize raw questionnaire JSON, logging every coercion.
    pub fn normalize(&self, raw: &Value) -> NormalizedFacts {
        let normalized = normalize_facts(raw);
        self.report_warnings(&normalized.warnings);
        normalized
    }

    /// Stateless evaluation of a raw facts payload.
    pub fn evaluate(&self, raw: &Value, line: InsuranceLine) -> Recommendation {
        let normalized = self.normalize(raw);
        generate_coverage_recommendation(line, &normalized.facts)
    }

    /// Stateless price estimate for a raw facts payload.
    pub fn estimate(&self, raw: &Value, line: InsuranceLine) -> [ProductTier; 3] {
        let normalized = self.normalize(raw);
        generate_product_tiers(line, &normalized.facts)
    }

    /// Normalize and store the answers for a session, replacing earlier ones.
    pub fn submit_facts(
        &self,
        session_id: SessionId,
        raw: &Value,
    ) -> Result<StoredFacts, AdvisoryServiceError> {
        let NormalizedFacts { facts, warnings } = self.normalize(raw);
        let record = StoredFacts {
            session_id,
            facts,
            warnings,
            submitted_at: Utc::now(),
        };

        let stored = self.repository.store(record)?;
        info!(
            session_id = %stored.session_id,
            warnings = stored.warnings.len(),
            "questionnaire facts stored"
        );
        Ok(stored)
    }

    pub fn recommendation(
        &self,
        session_id: &SessionId,
        line: InsuranceLine,
    ) -> Result<Recommendation, AdvisoryServiceError> {
        let facts = self.latest_facts(session_id)?;
        Ok(generate_coverage_recommendation(line, &facts))
    }

    pub fn product_tiers(
        &self,
        session_id: &SessionId,
        line: InsuranceLine,
    ) -> Result<[ProductTier; 3], AdvisoryServiceError> {
        let facts = self.latest_facts(session_id)?;
        Ok(generate_product_tiers(line, &facts))
    }

    /// Render the session's recommendation and hand it to the sink.
    pub fn send_recommendation(
        &self,
        session_id: &SessionId,
        line: InsuranceLine,
        recipient: &str,
    ) -> Result<DispatchReceipt, AdvisoryServiceError> {
        let recommendation = self.recommendation(session_id, line)?;
        let recipient = recipient.trim().to_string();

        let outcome = if recipient.is_empty() || !recipient.contains('@') {
            Err(NotificationError::InvalidRecipient(recipient.clone()))
        } else {
            let subject = match recommendation.company.name.trim() {
                "" => format!("Recomendación de {}", line.label()),
                name => format!("Recomendación de {} - {}", line.label(), name),
            };
            self.notifications.dispatch(RenderedDocument {
                recipient: recipient.clone(),
                subject,
                body: render_recommendation(&recommendation),
            })
        };

        let error = match outcome {
            Ok(()) => {
                info!(session_id = %session_id, line = %line, "recommendation dispatched");
                None
            }
            Err(error) => {
                warn!(
                    session_id = %session_id,
                    line = %line,
                    error = %error,
                    "recommendation dispatch failed"
                );
                Some(error.to_string())
            }
        };

        Ok(DispatchReceipt {
            session_id: session_id.clone(),
            line,
            recipient,
            delivered: error.is_none(),
            error,
        })
    }

    fn latest_facts(&self, session_id: &SessionId) -> Result<FactsRecord, AdvisoryServiceError> {
        self.repository
            .latest(session_id)?
            .map(|stored| stored.facts)
            .ok_or_else(|| AdvisoryServiceError::NoFormData(session_id.clone()))
    }

    fn report_warnings(&self, warnings: &[FactsWarning]) {
        for warning in warnings {
            if self.config.strict_facts {
                warn!(path = %warning.path, "malformed questionnaire field: {}", warning.message);
            } else {
                debug!(path = %warning.path, "malformed questionnaire field: {}", warning.message);
            }
        }
    }
}

/// Error raised by the advisory service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryServiceError {
    #[error("no form data found for session {0}")]
    NoFormData(SessionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
