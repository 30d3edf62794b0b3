//! Concurrent progress updates must reward a completion exactly once.

mod common;

use std::sync::Arc;

use futures::future::join_all;
use punchcard_core::achievement::{
    AchievementService, CreateAchievementInput, Goal, ProgressOutcome, Requirement,
};
use punchcard_core::points::PointsStore;
use punchcard_core::validity::Validity;
use punchcard_db::{AchievementRepository, PointsRepository, ProgressRepository};

#[tokio::test]
async fn test_racing_increments_complete_once() {
    let db = common::setup().await;
    let rid = common::restaurant(&db, "Noodle Bar").await;
    let user = common::customer(&db, "ada@example.com").await;
    let service = Arc::new(AchievementService::new(
        Arc::new(AchievementRepository::new(db.clone())),
        Arc::new(ProgressRepository::new(db.clone())),
    ));

    let achievement = service
        .create_achievement(CreateAchievementInput {
            restaurant_id: rid,
            name: "Three visits".to_string(),
            experience: 30,
            points: 12,
            requirement: Requirement {
                goal: Goal::Visit { times: 3 },
                validity: Validity::Indefinite,
            },
        })
        .await
        .unwrap();
    service.record_progress(user, achievement.id).await.unwrap();
    service.record_progress(user, achievement.id).await.unwrap();
    let row = service.find_progress(achievement.id, user).await.unwrap();

    let handles = (0..8).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.increment_progress(&row).await })
    });
    let outcomes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let completed = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(ProgressOutcome::Completed { .. })))
        .count();
    assert_eq!(completed, 1, "outcomes: {outcomes:?}");

    let balance = PointsRepository::new(db)
        .find(user, rid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!((balance.points, balance.experience), (12, 30));
}
