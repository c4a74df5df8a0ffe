// Library crate for the Wordle results ledger
// This file exposes the public API for integration tests

pub mod config;
pub mod ingest;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::{Config, LedgerConfig, RankingConfig};
pub use ingest::{EmptyDirectory, InMemoryMemberDirectory, Member, MemberDirectory};
pub use shared::{AppError, AppState};
pub use stats::{
    ApplyOutcome, IncomingMessage, InMemoryStatsRepository, ParticipantRecord, RankingRow,
    RankingView, StatsRepository, StatsService,
};
