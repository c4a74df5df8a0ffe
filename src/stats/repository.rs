use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{models::ParticipantRecord, StatsError};

/// Durable store for participant records and processed message ids
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn put_record(&self, record: &ParticipantRecord) -> Result<(), StatsError>;
    async fn get_all(&self) -> Result<HashMap<String, ParticipantRecord>, StatsError>;
    async fn clear_all(&self) -> Result<(), StatsError>;
    async fn mark_processed(&self, message_id: &str) -> Result<(), StatsError>;
    async fn processed_ids(&self) -> Result<Vec<String>, StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    records: Arc<RwLock<HashMap<String, ParticipantRecord>>>,
    processed: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_record(&self, participant_id: &str) -> Option<ParticipantRecord> {
        self.records.read().await.get(participant_id).cloned()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn put_record(&self, record: &ParticipantRecord) -> Result<(), StatsError> {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<HashMap<String, ParticipantRecord>, StatsError> {
        Ok(self.records.read().await.clone())
    }

    async fn clear_all(&self) -> Result<(), StatsError> {
        self.records.write().await.clear();
        self.processed.write().await.clear();
        Ok(())
    }

    async fn mark_processed(&self, message_id: &str) -> Result<(), StatsError> {
        self.processed.write().await.insert(message_id.to_string());
        Ok(())
    }

    async fn processed_ids(&self) -> Result<Vec<String>, StatsError> {
        Ok(self.processed.read().await.iter().cloned().collect())
    }
}

/// PostgreSQL implementation of the stats repository
pub struct PostgresStatsRepository {
    pool: PgPool,
}

impl PostgresStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), StatsError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS participants (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                games BIGINT NOT NULL DEFAULT 0,
                wins BIGINT NOT NULL DEFAULT 0,
                losses BIGINT NOT NULL DEFAULT 0,
                attempts DOUBLE PRECISION[] NOT NULL DEFAULT '{}',
                current_streak BIGINT NOT NULL DEFAULT 0,
                longest_streak BIGINT NOT NULL DEFAULT 0,
                handicap DOUBLE PRECISION NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query("CREATE TABLE IF NOT EXISTS processed_messages (message_id TEXT PRIMARY KEY)")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        debug!("Stats schema ready");
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> StatsError {
    warn!(error = %e, "Stats database operation failed");
    StatsError::Repository(e.to_string())
}

fn count(row: &PgRow, column: &str) -> Result<u32, StatsError> {
    let value: i64 = row.try_get(column).map_err(db_error)?;
    u32::try_from(value)
        .map_err(|_| StatsError::Repository(format!("column {column} out of range: {value}")))
}

fn record_from_row(row: &PgRow) -> Result<ParticipantRecord, StatsError> {
    Ok(ParticipantRecord {
        id: row.try_get("id").map_err(db_error)?,
        display_name: row.try_get("display_name").map_err(db_error)?,
        games: count(row, "games")?,
        wins: count(row, "wins")?,
        losses: count(row, "losses")?,
        attempts: row.try_get("attempts").map_err(db_error)?,
        current_streak: count(row, "current_streak")?,
        longest_streak: count(row, "longest_streak")?,
        handicap: row.try_get("handicap").map_err(db_error)?,
    })
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    #[instrument(skip(self, record), fields(participant_id = %record.id))]
    async fn put_record(&self, record: &ParticipantRecord) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO participants
                (id, display_name, games, wins, losses, attempts, current_streak, longest_streak, handicap)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                games = EXCLUDED.games,
                wins = EXCLUDED.wins,
                losses = EXCLUDED.losses,
                attempts = EXCLUDED.attempts,
                current_streak = EXCLUDED.current_streak,
                longest_streak = EXCLUDED.longest_streak,
                handicap = EXCLUDED.handicap",
        )
        .bind(&record.id)
        .bind(&record.display_name)
        .bind(i64::from(record.games))
        .bind(i64::from(record.wins))
        .bind(i64::from(record.losses))
        .bind(&record.attempts)
        .bind(i64::from(record.current_streak))
        .bind(i64::from(record.longest_streak))
        .bind(record.handicap)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        debug!("Participant record stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<HashMap<String, ParticipantRecord>, StatsError> {
        let rows = sqlx::query(
            "SELECT id, display_name, games, wins, losses, attempts, current_streak, longest_streak, handicap
             FROM participants",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut records = HashMap::with_capacity(rows.len());
        for row in &rows {
            let record = record_from_row(row)?;
            records.insert(record.id.clone(), record);
        }

        debug!(count = records.len(), "Loaded participant records");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<(), StatsError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        sqlx::query("DELETE FROM participants")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        sqlx::query("DELETE FROM processed_messages")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;

        debug!("Cleared all stats");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_processed(&self, message_id: &str) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO processed_messages (message_id) VALUES ($1) ON CONFLICT DO NOTHING",
        )
        .bind(message_id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn processed_ids(&self) -> Result<Vec<String>, StatsError> {
        let rows = sqlx::query("SELECT message_id FROM processed_messages")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter()
            .map(|row| row.try_get("message_id").map_err(db_error))
            .collect()
    }
}
