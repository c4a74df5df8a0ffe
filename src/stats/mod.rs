pub mod dedup;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod persistence;
pub mod ranking;
pub mod repository;
pub mod service;
pub mod types;

mod errors;

pub use errors::StatsError;
pub use handlers::router;
pub use models::*;
pub use repository::{InMemoryStatsRepository, PostgresStatsRepository, StatsRepository};
pub use service::StatsService;
