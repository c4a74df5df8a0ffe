use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use wordle_ledger::{stats::StatsError, ParticipantRecord, StatsRepository};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Repository whose writes always fail
#[derive(Default)]
pub struct FailingRepository {
    attempts: AtomicUsize,
}

impl FailingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsRepository for FailingRepository {
    async fn put_record(&self, _record: &ParticipantRecord) -> Result<(), StatsError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StatsError::Repository("connection reset".to_string()))
    }

    async fn get_all(&self) -> Result<HashMap<String, ParticipantRecord>, StatsError> {
        Ok(HashMap::new())
    }

    async fn clear_all(&self) -> Result<(), StatsError> {
        Err(StatsError::Repository("connection reset".to_string()))
    }

    async fn mark_processed(&self, _message_id: &str) -> Result<(), StatsError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StatsError::Repository("connection reset".to_string()))
    }

    async fn processed_ids(&self) -> Result<Vec<String>, StatsError> {
        Ok(Vec::new())
    }
}
