use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::facts::{FactsRecord, FactsWarning, SessionId};

/// Normalized questionnaire answers as stored for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFacts {
    pub session_id: SessionId,
    pub facts: FactsRecord,
    pub warnings: Vec<FactsWarning>,
    pub submitted_at: DateTime<Utc>,
}

impl StoredFacts {
    pub fn status_view(&self, include_warnings: bool) -> StoredFactsView {
        StoredFactsView {
            session_id: self.session_id.clone(),
            status: "stored",
            submitted_at: self.submitted_at,
            warning_count: self.warnings.len(),
            warnings: if include_warnings {
                self.warnings.clone()
            } else {
                Vec::new()
            },
        }
    }
}

/// Storage abstraction keyed by session. A later `store` for the same
/// session replaces the earlier record.
pub trait FactsRepository: Send + Sync {
    fn store(&self, record: StoredFacts) -> Result<StoredFacts, RepositoryError>;
    fn latest(&self, session_id: &SessionId) -> Result<Option<StoredFacts>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound delivery of rendered recommendations (e-mail or similar).
pub trait NotificationSink: Send + Sync {
    fn dispatch(&self, document: RenderedDocument) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("invalid recipient `{0}`")]
    InvalidRecipient(String),
}

/// Response body after facts are accepted.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFactsView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    pub warning_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FactsWarning>,
}
