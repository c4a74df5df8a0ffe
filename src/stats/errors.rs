use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("No qualifying record for participant {participant_id}")]
    NoQualifyingRecord { participant_id: String },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl StatsError {
    pub fn no_record(participant_id: impl Into<String>) -> Self {
        StatsError::NoQualifyingRecord {
            participant_id: participant_id.into(),
        }
    }
}
