use std::env;
use std::str::FromStr;

use tracing::warn;

/// How score updates are folded into the ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerConfig {
    /// Keep handicaps from pushing a score across the global mean
    pub handicap_clamp: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            handicap_clamp: true,
        }
    }
}

/// Leaderboard policy values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Shrinkage weight given to the global mean
    pub threshold: f64,
    /// Games needed to appear on the overall board
    pub min_games: usize,
    /// Current streak needed to appear on the streak board
    pub min_streak: u32,
    pub limit: Option<usize>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            min_games: 10,
            min_streak: 3,
            limit: Some(20),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; in-memory storage when unset
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub ledger: LedgerConfig,
    pub ranking: RankingConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let ledger_defaults = LedgerConfig::default();
        let ranking_defaults = RankingConfig::default();

        let limit = env_or("RANKING_LIMIT", ranking_defaults.limit.unwrap_or(0));

        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            ledger: LedgerConfig {
                handicap_clamp: env_or("HANDICAP_CLAMP", ledger_defaults.handicap_clamp),
            },
            ranking: RankingConfig {
                threshold: env_or("RANKING_THRESHOLD", ranking_defaults.threshold),
                min_games: env_or("RANKING_MIN_GAMES", ranking_defaults.min_games),
                min_streak: env_or("RANKING_MIN_STREAK", ranking_defaults.min_streak),
                // 0 disables the limit
                limit: (limit > 0).then_some(limit),
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}
