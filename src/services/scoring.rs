use crate::{
    db::RecommendationRepository,
    error::{AppError, AppResult},
    models::{Recommendation, ScoreChange},
};

pub const UPVOTE_DELTA: i32 = 1;
pub const DOWNVOTE_DELTA: i32 = -1;

/// Recommendations scoring strictly below this are deleted
pub const SCORE_FLOOR: i32 = -5;

/// What a downvote left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownvoteOutcome {
    /// The record is still stored with this score
    Scored(i32),
    /// The record crossed the floor and was deleted
    Removed,
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Recommendation {} not found", id))
}

/// Adds one point to a recommendation and returns it
pub async fn upvote(repo: &dyn RecommendationRepository, id: i32) -> AppResult<Recommendation> {
    match repo.adjust_score(id, UPVOTE_DELTA, None).await? {
        Some(ScoreChange::Updated(recommendation)) => {
            tracing::debug!(
                recommendation_id = id,
                score = recommendation.score,
                "Recommendation upvoted"
            );
            Ok(recommendation)
        }
        // No floor was passed, so the store has no reason to delete
        Some(ScoreChange::Removed(_)) => Err(AppError::Internal(format!(
            "Recommendation {} was removed by an upvote",
            id
        ))),
        None => Err(not_found(id)),
    }
}

/// Takes one point from a recommendation, deleting it once it drops below [`SCORE_FLOOR`]
pub async fn downvote(
    repo: &dyn RecommendationRepository,
    id: i32,
) -> AppResult<DownvoteOutcome> {
    match repo
        .adjust_score(id, DOWNVOTE_DELTA, Some(SCORE_FLOOR))
        .await?
    {
        Some(ScoreChange::Updated(recommendation)) => {
            tracing::debug!(
                recommendation_id = id,
                score = recommendation.score,
                "Recommendation downvoted"
            );
            Ok(DownvoteOutcome::Scored(recommendation.score))
        }
        Some(ScoreChange::Removed(recommendation)) => {
            tracing::info!(
                recommendation_id = id,
                name = %recommendation.name,
                score = recommendation.score,
                floor = SCORE_FLOOR,
                "Recommendation removed after falling below the score floor"
            );
            Ok(DownvoteOutcome::Removed)
        }
        None => Err(not_found(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryRecommendationRepository, MockRecommendationRepository};
    use crate::models::NewRecommendation;
    use chrono::Utc;

    fn recommendation(id: i32, score: i32) -> Recommendation {
        Recommendation {
            id,
            name: format!("song-{}", id),
            youtube_link: format!("https://youtube.com/watch?v={}", id),
            score,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upvote_adds_one_without_floor() {
        let mut mock = MockRecommendationRepository::new();
        mock.expect_adjust_score()
            .withf(|id, delta, floor| *id == 3 && *delta == 1 && floor.is_none())
            .times(1)
            .returning(|id, _, _| Ok(Some(ScoreChange::Updated(recommendation(id, 11)))));

        let updated = upvote(&mock, 3).await.unwrap();
        assert_eq!(updated.score, 11);
    }

    #[tokio::test]
    async fn test_upvote_missing_is_not_found() {
        let mut mock = MockRecommendationRepository::new();
        mock.expect_adjust_score().returning(|_, _, _| Ok(None));

        let err = upvote(&mock, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_downvote_passes_floor() {
        let mut mock = MockRecommendationRepository::new();
        mock.expect_adjust_score()
            .withf(|id, delta, floor| *id == 4 && *delta == -1 && *floor == Some(-5))
            .times(1)
            .returning(|id, _, _| Ok(Some(ScoreChange::Updated(recommendation(id, -2)))));

        let outcome = downvote(&mock, 4).await.unwrap();
        assert_eq!(outcome, DownvoteOutcome::Scored(-2));
    }

    #[tokio::test]
    async fn test_downvote_reports_removal() {
        let mut mock = MockRecommendationRepository::new();
        mock.expect_adjust_score()
            .returning(|id, _, _| Ok(Some(ScoreChange::Removed(recommendation(id, -6)))));

        let outcome = downvote(&mock, 4).await.unwrap();
        assert_eq!(outcome, DownvoteOutcome::Removed);
    }

    #[tokio::test]
    async fn test_downvote_missing_is_not_found() {
        let mut mock = MockRecommendationRepository::new();
        mock.expect_adjust_score().returning(|_, _, _| Ok(None));

        let err = downvote(&mock, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_six_downvotes_delete_a_fresh_recommendation() {
        let repo = InMemoryRecommendationRepository::new();
        let created = repo
            .create(NewRecommendation::new("fading", "https://youtube.com/watch?v=f"))
            .await
            .unwrap();

        for expected in 1..=5 {
            let outcome = downvote(&repo, created.id).await.unwrap();
            assert_eq!(outcome, DownvoteOutcome::Scored(-expected));
        }
        assert_eq!(
            downvote(&repo, created.id).await.unwrap(),
            DownvoteOutcome::Removed
        );

        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            downvote(&repo, created.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_upvote_then_downvote_round_trip() {
        let repo = InMemoryRecommendationRepository::new();
        let created = repo
            .create(NewRecommendation::new("steady", "https://youtube.com/watch?v=s"))
            .await
            .unwrap();

        assert_eq!(upvote(&repo, created.id).await.unwrap().score, 1);
        assert_eq!(
            downvote(&repo, created.id).await.unwrap(),
            DownvoteOutcome::Scored(0)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_downvotes_never_leave_record_below_floor() {
        let repo = std::sync::Arc::new(InMemoryRecommendationRepository::new());
        let created = repo
            .create(NewRecommendation::new("contested", "https://youtube.com/watch?v=c"))
            .await
            .unwrap();
        let id = created.id;

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { downvote(repo.as_ref(), id).await })
            })
            .collect();

        let mut succeeded = 0;
        let mut removed = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(DownvoteOutcome::Removed) => {
                    succeeded += 1;
                    removed += 1;
                }
                Ok(DownvoteOutcome::Scored(score)) => {
                    assert!(score >= SCORE_FLOOR);
                    succeeded += 1;
                }
                Err(e) => assert!(matches!(e, AppError::NotFound(_))),
            }
        }

        // 0 -> -5 takes five votes, the sixth deletes, the rest find nothing
        assert_eq!(succeeded, 6);
        assert_eq!(removed, 1);
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
