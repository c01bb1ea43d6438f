pub mod memory;
pub mod postgres;

pub use memory::InMemoryRecommendationRepository;
pub use postgres::{create_pool, run_migrations, PgRecommendationRepository};

use crate::{
    error::AppResult,
    models::{NewRecommendation, Recommendation, ScoreChange},
};

/// Storage interface for recommendations
///
/// Implementations must make `adjust_score` atomic per record: the score update and
/// the conditional floor deletion happen as one unit, so concurrent votes on the same
/// record can never leave it persisted below the floor.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Inserts a new recommendation with a score of 0
    ///
    /// Returns [`AppError::Conflict`](crate::error::AppError::Conflict) if the name is taken.
    async fn create(&self, new: NewRecommendation) -> AppResult<Recommendation>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Recommendation>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Recommendation>>;

    /// Removes a record. Returns `false` when nothing matched.
    async fn delete_by_id(&self, id: i32) -> AppResult<bool>;

    /// Removes every record and returns how many were deleted
    async fn delete_all(&self) -> AppResult<u64>;

    /// Newest first
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Recommendation>>;

    /// Highest score first, ties broken by insertion order
    async fn list_top_by_score(&self, limit: i64) -> AppResult<Vec<Recommendation>>;

    async fn list_all(&self) -> AppResult<Vec<Recommendation>>;

    /// Adds `delta` to the record's score
    ///
    /// When `floor` is set and the new score is strictly below it, the record is
    /// deleted in the same atomic unit. Returns `None` if no record has this id.
    async fn adjust_score(
        &self,
        id: i32,
        delta: i32,
        floor: Option<i32>,
    ) -> AppResult<Option<ScoreChange>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
