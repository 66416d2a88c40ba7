use chrono::{DateTime, Utc};
use coverage_advisor::advisory::{
    FactsRepository, InsuranceLine, NotificationError, NotificationSink, RenderedDocument,
    RepositoryError, SessionId, StoredFacts, UnknownLine,
};
use coverage_advisor::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFactsRepository {
    records: Arc<Mutex<HashMap<SessionId, StoredFacts>>>,
}

impl FactsRepository for InMemoryFactsRepository {
    fn store(&self, record: StoredFacts) -> Result<StoredFacts, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn latest(&self, session_id: &SessionId) -> Result<Option<StoredFacts>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }
}

/// Keeps dispatched documents in memory; stands in for an SMTP relay.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationSink {
    outbox: Arc<Mutex<Vec<(DateTime<Utc>, RenderedDocument)>>>,
}

impl NotificationSink for InMemoryNotificationSink {
    fn dispatch(&self, document: RenderedDocument) -> Result<(), NotificationError> {
        info!(recipient = %document.recipient, subject = %document.subject, "document queued");
        let mut guard = self.outbox.lock().expect("outbox mutex poisoned");
        guard.push((Utc::now(), document));
        Ok(())
    }
}

impl InMemoryNotificationSink {
    pub(crate) fn sent(&self) -> Vec<(DateTime<Utc>, RenderedDocument)> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }
}

pub(crate) fn parse_line(raw: &str) -> Result<InsuranceLine, UnknownLine> {
    raw.parse::<InsuranceLine>()
}

pub(crate) fn load_facts(path: &Path) -> Result<Value, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use coverage_advisor::advisory::FactsRecord;

    #[test]
    fn repository_keeps_latest_submission() {
        let repository = InMemoryFactsRepository::default();
        let id = SessionId("s-1".to_string());

        let mut facts = FactsRecord::default();
        for billing in [100.0, 200.0] {
            facts.company.billing = billing;
            repository
                .store(StoredFacts {
                    session_id: id.clone(),
                    facts: facts.clone(),
                    warnings: Vec::new(),
                    submitted_at: Utc::now(),
                })
                .expect("stored");
        }

        let latest = repository.latest(&id).expect("lookup").expect("present");
        assert_eq!(latest.facts.company.billing, 200.0);
    }

    #[test]
    fn parse_line_reports_unknown_values() {
        assert_eq!(parse_line("rc"), Ok(InsuranceLine::ResponsabilidadCivil));
        let error = parse_line("auto").expect_err("unknown line");
        assert_eq!(error, UnknownLine("auto".to_string()));
        assert_eq!(error.to_string(), "unknown insurance line `auto`");
    }

    #[test]
    fn load_facts_surfaces_missing_files() {
        let error = load_facts(Path::new("/nonexistent/facts.json")).expect_err("missing file");
        assert!(matches!(error, AppError::Io(_)));
    }
}
