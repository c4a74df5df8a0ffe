use crate::config::RankingConfig;

use super::models::{ParticipantRecord, RankingRow, RankingView};

/// Global mean used when no attempts have been recorded anywhere
pub const DEFAULT_GLOBAL_MEAN: f64 = 4.5;

/// Mean of every attempt value across all participants.
pub fn global_mean<'a>(records: impl IntoIterator<Item = &'a ParticipantRecord>) -> f64 {
    let (sum, count) = records
        .into_iter()
        .flat_map(|record| record.attempts.iter())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        DEFAULT_GLOBAL_MEAN
    } else {
        sum / count as f64
    }
}

/// Shrinks `average` toward `global_mean`; the pull weakens as `n` grows.
pub fn bayesian_average(average: f64, n: usize, global_mean: f64, threshold: f64) -> f64 {
    let n = n as f64;
    (threshold * global_mean + n * average) / (threshold + n)
}

/// Sample standard deviation, 0 for fewer than two values
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

pub struct RankingEngine {
    config: RankingConfig,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn rank<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ParticipantRecord> + Clone,
        view: RankingView,
    ) -> Vec<RankingRow> {
        let mean = global_mean(records.clone());

        let mut rows: Vec<RankingRow> = records
            .into_iter()
            .filter_map(|record| self.row_for(record, mean))
            .collect();

        match view {
            RankingView::Overall => {
                rows.retain(|row| row.games >= self.config.min_games);
                rows.sort_by(|a, b| {
                    a.adjusted_average
                        .total_cmp(&b.adjusted_average)
                        .then_with(|| a.average.total_cmp(&b.average))
                        .then_with(|| b.games.cmp(&a.games))
                        .then_with(|| a.participant_id.cmp(&b.participant_id))
                });
            }
            RankingView::Streak => {
                rows.retain(|row| row.current_streak >= self.config.min_streak);
                rows.sort_by(|a, b| {
                    b.current_streak
                        .cmp(&a.current_streak)
                        .then_with(|| a.average.total_cmp(&b.average))
                        .then_with(|| a.participant_id.cmp(&b.participant_id))
                });
            }
        }

        if let Some(limit) = self.config.limit {
            rows.truncate(limit);
        }

        rows
    }

    fn row_for(&self, record: &ParticipantRecord, global_mean: f64) -> Option<RankingRow> {
        let n = record.attempts.len();
        if n == 0 {
            return None;
        }

        let average = record.attempts.iter().sum::<f64>() / n as f64;
        let completion_rate = match record.games {
            0 => 0.0,
            games => f64::from(record.wins) / f64::from(games),
        };

        Some(RankingRow {
            participant_id: record.id.clone(),
            display_name: record.display_name.clone(),
            average,
            adjusted_average: bayesian_average(average, n, global_mean, self.config.threshold),
            std_dev: std_dev(&record.attempts),
            games: n,
            completion_rate,
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
        })
    }
}
