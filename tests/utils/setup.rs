use std::sync::Arc;

use wordle_ledger::{
    InMemoryMemberDirectory, InMemoryStatsRepository, Member, RankingConfig, StatsService,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub stats_service: StatsService,
    pub stats_repository: Arc<InMemoryStatsRepository>,
    pub directory: InMemoryMemberDirectory,
}

pub struct TestSetupBuilder {
    members: Vec<Member>,
    ranking: RankingConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            members: vec![],
            ranking: RankingConfig {
                threshold: 1.0,
                min_games: 1,
                min_streak: 3,
                limit: None,
            },
        }
    }

    pub fn with_members(mut self, members: Vec<(u64, &str)>) -> Self {
        self.members = members
            .into_iter()
            .map(|(id, name)| Member {
                id,
                display_name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn build(self) -> TestSetup {
        let stats_repository = Arc::new(InMemoryStatsRepository::new());
        let stats_service = StatsService::builder(stats_repository.clone())
            .with_ranking_config(self.ranking)
            .build();

        TestSetup {
            stats_service,
            stats_repository,
            directory: InMemoryMemberDirectory::with_members(self.members),
        }
    }
}
