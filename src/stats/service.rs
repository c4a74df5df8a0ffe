use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::{LedgerConfig, RankingConfig};
use crate::ingest::{classify, parse_results, puzzle::announced_puzzle, resolve, MemberDirectory};

use super::{
    dedup::DedupGuard,
    ledger::Ledger,
    models::{ApplyOutcome, IncomingMessage, ParticipantRecord, RankingRow, RankingView, ScoreUpdate},
    persistence::PersistenceQueue,
    ranking::RankingEngine,
    repository::StatsRepository,
    StatsError,
};

/// Everything a single message mutates, guarded as one unit
#[derive(Debug)]
struct StatsState {
    ledger: Ledger,
    dedup: DedupGuard,
}

/// Orchestrates classification, parsing, resolution and ledger updates
pub struct StatsService {
    state: RwLock<StatsState>,
    repository: Arc<dyn StatsRepository>,
    persistence: PersistenceQueue,
    ranking: RankingEngine,
    ledger_config: LedgerConfig,
}

impl StatsService {
    pub fn builder(repository: Arc<dyn StatsRepository>) -> StatsServiceBuilder {
        StatsServiceBuilder::new(repository)
    }

    /// Replaces in-memory state with what the repository holds.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, StatsError> {
        let records = self.repository.get_all().await?;
        let processed = self.repository.processed_ids().await?;

        let mut state = self.state.write().await;
        state.ledger = Ledger::with_records(self.ledger_config, records.into_values().collect());
        state.dedup = DedupGuard::with_processed(processed);

        info!(
            participants = state.ledger.len(),
            processed_messages = state.dedup.len(),
            "Loaded stats from repository"
        );
        Ok(state.ledger.len())
    }

    /// Applies one announcement. Re-delivery of a processed message id is a no-op.
    #[instrument(skip(self, message, directory), fields(message_id = %message.message_id))]
    pub async fn apply_message(
        &self,
        message: &IncomingMessage,
        directory: &dyn MemberDirectory,
    ) -> ApplyOutcome {
        let Some(announcement) = classify(&message.text) else {
            debug!("Message is not a results announcement");
            return ApplyOutcome::not_applicable();
        };

        let mut outcome = ApplyOutcome {
            applicable: true,
            group_streak: announcement.group_streak,
            puzzle_number: message.posted_at.and_then(announced_puzzle),
            ..ApplyOutcome::default()
        };

        // Resolution happens under the write lock so messages commit in arrival order.
        let mut state = self.state.write().await;
        if !state.dedup.mark_processed(&message.message_id) {
            info!("Message already processed");
            outcome.duplicate = true;
            return outcome;
        }
        self.persistence.mark_processed(&message.message_id);

        let parsed = parse_results(announcement.lines());
        let updates = resolve_updates(&parsed, directory).await;
        if updates.is_empty() {
            warn!("Announcement contained no usable results");
        }

        let mut present = HashSet::with_capacity(updates.len());
        for update in &updates {
            if !present.insert(update.participant_id.clone()) {
                warn!(
                    participant_id = %update.participant_id,
                    "Participant listed more than once; keeping first result"
                );
                continue;
            }
            let record = state.ledger.apply(update);
            self.persistence.put(record);
            outcome.applied += 1;
        }

        let reset = state.ledger.reset_absent(&present);
        outcome.streaks_reset = reset.len();
        for record in reset {
            self.persistence.put(record);
        }

        info!(
            applied = outcome.applied,
            streaks_reset = outcome.streaks_reset,
            group_streak = ?outcome.group_streak,
            "Announcement applied"
        );
        outcome
    }

    /// Applies messages one after another in the order given.
    #[instrument(skip_all)]
    pub async fn replay<'a>(
        &self,
        messages: impl IntoIterator<Item = &'a IncomingMessage>,
        directory: &dyn MemberDirectory,
    ) -> usize {
        let mut applied = 0;
        let mut seen = 0;
        for message in messages {
            applied += self.apply_message(message, directory).await.applied;
            seen += 1;
        }
        info!(messages = seen, applied, "Replay finished");
        applied
    }

    #[instrument(skip(self))]
    pub async fn set_handicap(
        &self,
        participant_id: &str,
        value: f64,
    ) -> Result<ParticipantRecord, StatsError> {
        let mut state = self.state.write().await;
        let record = state.ledger.set_handicap(participant_id, value)?;
        self.persistence.put(record.clone());

        info!(handicap = value, "Handicap updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn replace_lowest_score(
        &self,
        participant_id: &str,
        value: f64,
    ) -> Result<ParticipantRecord, StatsError> {
        let mut state = self.state.write().await;
        let record = state.ledger.replace_lowest_score(participant_id, value)?;
        self.persistence.put(record.clone());

        info!(replacement = value, "Lowest score replaced");
        Ok(record)
    }

    pub async fn rank(&self, view: RankingView) -> Vec<RankingRow> {
        let state = self.state.read().await;
        self.ranking.rank(state.ledger.records(), view)
    }

    pub async fn record(&self, participant_id: &str) -> Option<ParticipantRecord> {
        self.state.read().await.ledger.get(participant_id).cloned()
    }

    /// All records, ordered by participant id
    pub async fn records(&self) -> Vec<ParticipantRecord> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state.ledger.records().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub async fn global_mean(&self) -> f64 {
        self.state.read().await.ledger.global_mean()
    }

    /// Clears every record and every processed message id.
    #[instrument(skip(self))]
    pub async fn reset_all(&self) {
        let mut state = self.state.write().await;
        state.ledger.clear();
        state.dedup.clear();
        self.persistence.clear_all();

        warn!("All stats reset");
    }

    /// Waits for queued writes to reach the repository.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }
}

async fn resolve_updates(
    parsed: &[crate::ingest::ParsedResult],
    directory: &dyn MemberDirectory,
) -> Vec<ScoreUpdate> {
    let mut updates = Vec::with_capacity(parsed.len());
    for result in parsed {
        let participant = resolve(directory, &result.mention).await;
        updates.push(ScoreUpdate {
            participant_id: participant.id,
            display_name: participant.display_name,
            name_resolved: participant.resolved,
            attempts: result.attempts,
            success: result.success,
        });
    }
    updates
}

pub struct StatsServiceBuilder {
    repository: Arc<dyn StatsRepository>,
    ledger_config: LedgerConfig,
    ranking_config: RankingConfig,
}

impl StatsServiceBuilder {
    fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self {
            repository,
            ledger_config: LedgerConfig::default(),
            ranking_config: RankingConfig::default(),
        }
    }

    pub fn with_ledger_config(mut self, config: LedgerConfig) -> Self {
        self.ledger_config = config;
        self
    }

    pub fn with_ranking_config(mut self, config: RankingConfig) -> Self {
        self.ranking_config = config;
        self
    }

    /// Spawns the persistence worker, so this needs a tokio runtime.
    pub fn build(self) -> StatsService {
        StatsService {
            state: RwLock::new(StatsState {
                ledger: Ledger::new(self.ledger_config),
                dedup: DedupGuard::new(),
            }),
            persistence: PersistenceQueue::spawn(self.repository.clone()),
            repository: self.repository,
            ranking: RankingEngine::new(self.ranking_config),
            ledger_config: self.ledger_config,
        }
    }
}
