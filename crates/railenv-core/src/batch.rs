//! Outcome of a best-effort fan-out.

use crate::error::PreviewError;

/// Per-member results of a batch of independent remote operations.
///
/// A batch never fails as a whole; members that failed are kept alongside
/// the id they were issued for.
#[derive(Debug, Default)]
pub struct BatchResult<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<(String, PreviewError)>,
}

impl<T> BatchResult<T> {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn record_success(&mut self, value: T) {
        self.succeeded.push(value);
    }

    pub fn record_failure(&mut self, id: impl Into<String>, error: PreviewError) {
        self.failed.push((id.into(), error));
    }

    /// Number of members attempted
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the failed members
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|(id, _)| id.as_str()).collect()
    }
}
