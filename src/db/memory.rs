use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{NewRecommendation, Recommendation, ScoreChange},
};

use super::RecommendationRepository;

/// Process-local recommendation store
///
/// Records are keyed by id in a `BTreeMap`, so iteration order is insertion order.
/// Every mutation holds the write lock for its whole duration.
#[derive(Clone, Default)]
pub struct InMemoryRecommendationRepository {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<i32, Recommendation>,
    last_id: i32,
}

impl InMemoryRecommendationRepository {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn limit_to_usize(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}

#[async_trait::async_trait]
impl RecommendationRepository for InMemoryRecommendationRepository {
    async fn create(&self, new: NewRecommendation) -> AppResult<Recommendation> {
        let mut inner = self.inner.write().await;

        if inner.records.values().any(|r| r.name == new.name) {
            return Err(AppError::Conflict(format!(
                "Recommendation '{}' already exists",
                new.name
            )));
        }

        inner.last_id += 1;
        let recommendation = Recommendation {
            id: inner.last_id,
            name: new.name,
            youtube_link: new.youtube_link,
            score: 0,
            created_at: Utc::now(),
        };
        inner
            .records
            .insert(recommendation.id, recommendation.clone());

        Ok(recommendation)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().find(|r| r.name == name).cloned())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.records.remove(&id).is_some())
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let count = inner.records.len() as u64;
        inner.records.clear();
        Ok(count)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .values()
            .rev()
            .take(limit_to_usize(limit))
            .cloned()
            .collect())
    }

    async fn list_top_by_score(&self, limit: i64) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        let mut records: Vec<Recommendation> = inner.records.values().cloned().collect();
        // stable sort keeps id order among equal scores
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(limit_to_usize(limit));
        Ok(records)
    }

    async fn list_all(&self) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().cloned().collect())
    }

    async fn adjust_score(
        &self,
        id: i32,
        delta: i32,
        floor: Option<i32>,
    ) -> AppResult<Option<ScoreChange>> {
        let mut inner = self.inner.write().await;

        let Some(record) = inner.records.get_mut(&id) else {
            return Ok(None);
        };
        record.score = record.score.saturating_add(delta);
        let updated = record.clone();

        let change = match floor {
            Some(floor) if updated.score < floor => {
                inner.records.remove(&id);
                ScoreChange::Removed(updated)
            }
            _ => ScoreChange::Updated(updated),
        };

        Ok(Some(change))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
