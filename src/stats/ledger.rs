use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::LedgerConfig;

use super::models::{ParticipantRecord, ScoreUpdate};
use super::ranking::global_mean;
use super::StatsError;

/// Applies a participant's handicap to a raw attempt count.
///
/// With `clamp` set, a penalty never lifts the value above `global_mean` and a
/// bonus never drops it below; a raw value already on the far side of the mean
/// is left as is.
pub fn adjust_attempts(raw: f64, handicap: f64, global_mean: f64, clamp: bool) -> f64 {
    if handicap == 0.0 {
        return raw;
    }
    if !clamp {
        return raw + handicap;
    }

    if handicap > 0.0 {
        (raw + handicap).min(global_mean.max(raw))
    } else {
        (raw + handicap).max(global_mean.min(raw))
    }
}

/// In-memory per-participant state machine
#[derive(Debug, Default)]
pub struct Ledger {
    records: HashMap<String, ParticipantRecord>,
    config: LedgerConfig,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            records: HashMap::new(),
            config,
        }
    }

    pub fn with_records(config: LedgerConfig, records: Vec<ParticipantRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
            config,
        }
    }

    pub fn get(&self, participant_id: &str) -> Option<&ParticipantRecord> {
        self.records.get(participant_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &ParticipantRecord> + Clone {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn global_mean(&self) -> f64 {
        global_mean(self.records.values())
    }

    /// Folds one result into the participant's record, creating it on first sight.
    pub fn apply(&mut self, update: &ScoreUpdate) -> ParticipantRecord {
        let mean = self.global_mean();
        let clamp = self.config.handicap_clamp;

        let record = self
            .records
            .entry(update.participant_id.clone())
            .or_insert_with(|| {
                ParticipantRecord::new(update.participant_id.clone(), update.display_name.clone())
            });

        if update.name_resolved {
            record.display_name = update.display_name.clone();
        }

        let adjusted = adjust_attempts(f64::from(update.attempts), record.handicap, mean, clamp);
        record.attempts.push(adjusted);
        record.games += 1;
        if update.success {
            record.wins += 1;
        } else {
            record.losses += 1;
        }

        record.current_streak += 1;
        record.longest_streak = record.longest_streak.max(record.current_streak);

        debug!(
            participant_id = %record.id,
            raw = update.attempts,
            adjusted,
            current_streak = record.current_streak,
            "Applied score update"
        );

        record.clone()
    }

    /// Breaks the streak of everyone not in `present`. Returns the records that changed.
    pub fn reset_absent(&mut self, present: &HashSet<String>) -> Vec<ParticipantRecord> {
        self.records
            .values_mut()
            .filter(|record| record.current_streak > 0 && !present.contains(&record.id))
            .map(|record| {
                record.current_streak = 0;
                record.clone()
            })
            .collect()
    }

    /// Overwrites the lowest recorded attempt value in place.
    pub fn replace_lowest_score(
        &mut self,
        participant_id: &str,
        value: f64,
    ) -> Result<ParticipantRecord, StatsError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(StatsError::Validation(format!(
                "replacement score must be a positive number, got {value}"
            )));
        }

        let record = self
            .records
            .get_mut(participant_id)
            .ok_or_else(|| StatsError::no_record(participant_id))?;

        let lowest = record
            .attempts
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
            .ok_or_else(|| StatsError::no_record(participant_id))?;

        record.attempts[lowest] = value;
        Ok(record.clone())
    }

    pub fn set_handicap(
        &mut self,
        participant_id: &str,
        value: f64,
    ) -> Result<ParticipantRecord, StatsError> {
        if !value.is_finite() {
            return Err(StatsError::Validation(format!(
                "handicap must be a finite number, got {value}"
            )));
        }

        let record = self
            .records
            .get_mut(participant_id)
            .ok_or_else(|| StatsError::no_record(participant_id))?;

        record.handicap = value;
        Ok(record.clone())
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
