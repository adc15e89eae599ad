//! The external, possibly flaky, file classifier.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierReply {
    pub text: String,
}

impl ClassifierReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable")]
    Unavailable,
    #[error("classifier timed out")]
    Timeout,
    #[error("classifier failed: {0}")]
    Failed(String),
}

/// Suggests a panel type for a file. Implementations may fail freely: the
/// router treats every failure as "use the fallback table".
#[async_trait]
pub trait FileClassifier: Send + Sync {
    async fn classify_file(
        &self,
        file_name: &str,
        category: &str,
    ) -> Result<ClassifierReply, ClassifierError>;
}

/// A classifier for hosts without one configured. Always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassifier;

#[async_trait]
impl FileClassifier for NoClassifier {
    async fn classify_file(
        &self,
        _file_name: &str,
        _category: &str,
    ) -> Result<ClassifierReply, ClassifierError> {
        Err(ClassifierError::Unavailable)
    }
}
