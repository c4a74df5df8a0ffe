mod utils;

use std::sync::Arc;

use utils::builders::mention;
use utils::{AnnouncementBuilder, FailingRepository, TestSetupBuilder};
use wordle_ledger::{
    EmptyDirectory, IncomingMessage, Member, RankingConfig, RankingView, StatsRepository,
    StatsService,
};

#[tokio::test]
async fn week_of_announcements_builds_consistent_leaderboards() {
    let setup = TestSetupBuilder::new()
        .with_members(vec![(1, "Ann"), (2, "Ben"), (3, "Cat")])
        .with_ranking(RankingConfig {
            threshold: 2.0,
            min_games: 3,
            min_streak: 3,
            limit: None,
        })
        .build();

    let (ann, ben, cat) = (mention(1), mention(2), mention(3));
    let days = vec![
        AnnouncementBuilder::new()
            .crowned("3", &[&ann])
            .line("4", &[&ben, &cat]),
        AnnouncementBuilder::new()
            .group_streak(2)
            .crowned("2", &[&ann])
            .line("5", &[&ben])
            .line("X", &[&cat]),
        AnnouncementBuilder::new()
            .group_streak(3)
            .crowned("3", &[&ben])
            .line("4", &[&ann]),
        AnnouncementBuilder::new()
            .group_streak(4)
            .crowned("3", &[&ann, &ben])
            .line("6", &["@cat"]),
    ];

    let messages: Vec<IncomingMessage> = days
        .iter()
        .enumerate()
        .map(|(day, builder)| builder.build(&format!("day-{day}")))
        .collect();

    let applied = setup
        .stats_service
        .replay(&messages, &setup.directory)
        .await;
    assert_eq!(applied, 11);

    for record in setup.stats_service.records().await {
        assert_eq!(record.games, record.wins + record.losses, "{}", record.id);
        assert!(record.longest_streak >= record.current_streak, "{}", record.id);
    }

    let cat = setup.stats_service.record("3").await.unwrap();
    assert_eq!(cat.display_name, "Cat");
    assert_eq!(cat.games, 3);
    assert_eq!(cat.losses, 1);
    assert_eq!(cat.current_streak, 1);
    assert_eq!(cat.longest_streak, 2);

    let overall = setup.stats_service.rank(RankingView::Overall).await;
    let order: Vec<_> = overall.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(order, vec!["Ann", "Ben", "Cat"]);

    let streaks = setup.stats_service.rank(RankingView::Streak).await;
    let order: Vec<_> = streaks.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(order, vec!["Ann", "Ben"]);
    assert!(streaks.iter().all(|r| r.current_streak == 4));
}

#[tokio::test]
async fn redelivered_history_is_idempotent() {
    let setup = TestSetupBuilder::new().build();
    let message = AnnouncementBuilder::new()
        .line("3", &[&mention(111)])
        .line("5", &[&mention(222)])
        .line("X", &[&mention(333)])
        .build("m1");

    let first = setup
        .stats_service
        .apply_message(&message, &setup.directory)
        .await;
    let snapshot = setup.stats_service.records().await;
    let second = setup
        .stats_service
        .apply_message(&message, &setup.directory)
        .await;

    assert_eq!(first.applied, 3);
    assert_eq!(second.applied, 0);
    assert!(second.duplicate);
    assert_eq!(setup.stats_service.records().await, snapshot);

    let attempts: Vec<Vec<f64>> = snapshot.iter().map(|r| r.attempts.clone()).collect();
    assert_eq!(attempts, vec![vec![3.0], vec![5.0], vec![6.0]]);
}

#[tokio::test]
async fn persisted_state_survives_restart() {
    let setup = TestSetupBuilder::new().build();
    let message = AnnouncementBuilder::new()
        .line("4", &[&mention(5), "@drifter"])
        .build("m1");

    setup
        .stats_service
        .apply_message(&message, &EmptyDirectory)
        .await;
    setup
        .stats_service
        .set_handicap("5", 0.5)
        .await
        .unwrap();
    setup.stats_service.flush().await;

    let stored = setup.stats_repository.get_all().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored["5"].handicap, 0.5);
    assert_eq!(stored["name:drifter"].display_name, "drifter");

    let restarted = StatsService::builder(setup.stats_repository.clone()).build();
    restarted.load().await.unwrap();

    assert_eq!(restarted.records().await, setup.stats_service.records().await);
    let again = restarted.apply_message(&message, &EmptyDirectory).await;
    assert!(again.duplicate);
}

#[tokio::test]
async fn persistence_failures_do_not_affect_memory() {
    let repository = Arc::new(FailingRepository::new());
    let service = StatsService::builder(repository.clone()).build();

    let message = AnnouncementBuilder::new()
        .line("2", &[&mention(1)])
        .build("m1");
    let outcome = service.apply_message(&message, &EmptyDirectory).await;
    service.flush().await;

    assert_eq!(outcome.applied, 1);
    // One processed-message write plus one record write
    assert_eq!(repository.write_attempts(), 2);

    let record = service.record("1").await.unwrap();
    assert_eq!(record.attempts, vec![2.0]);
    assert_eq!(record.games, 1);
    assert_eq!(record.current_streak, 1);

    let next = AnnouncementBuilder::new()
        .line("4", &[&mention(1)])
        .build("m2");
    service.apply_message(&next, &EmptyDirectory).await;
    service.flush().await;

    let record = service.record("1").await.unwrap();
    assert_eq!(record.attempts, vec![2.0, 4.0]);
    assert_eq!(record.current_streak, 2);
    assert_eq!(repository.write_attempts(), 4);
}

#[tokio::test]
async fn renamed_member_keeps_history_under_same_id() {
    let setup = TestSetupBuilder::new().with_members(vec![(9, "Old Name")]).build();

    setup
        .stats_service
        .apply_message(
            &AnnouncementBuilder::new().line("4", &[&mention(9)]).build("m1"),
            &setup.directory,
        )
        .await;

    setup
        .directory
        .upsert(Member {
            id: 9,
            display_name: "NewName".to_string(),
        })
        .await;

    setup
        .stats_service
        .apply_message(
            &AnnouncementBuilder::new().line("3", &["@newname"]).build("m2"),
            &setup.directory,
        )
        .await;

    let record = setup.stats_service.record("9").await.unwrap();
    assert_eq!(record.display_name, "NewName");
    assert_eq!(record.attempts, vec![4.0, 3.0]);
    assert_eq!(record.current_streak, 2);
}
