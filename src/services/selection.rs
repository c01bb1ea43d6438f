use rand::Rng;

use crate::{
    db::RecommendationRepository,
    error::{AppError, AppResult},
    models::Recommendation,
};

/// How many recommendations the recency listing returns
pub const RECENT_LIMIT: i64 = 10;

/// Scores strictly above this land in the popular bucket
pub const POPULAR_THRESHOLD: i32 = 10;

/// Chance that a random pick draws from the popular bucket
pub const POPULAR_PROBABILITY: f64 = 0.7;

/// The newest recommendations, newest first
pub async fn get_recent(repo: &dyn RecommendationRepository) -> AppResult<Vec<Recommendation>> {
    repo.list_recent(RECENT_LIMIT).await
}

/// Up to `amount` recommendations with the highest scores
pub async fn get_top(
    repo: &dyn RecommendationRepository,
    amount: i64,
) -> AppResult<Vec<Recommendation>> {
    if amount <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Amount must be a positive integer, got {}",
            amount
        )));
    }

    repo.list_top_by_score(amount).await
}

pub async fn get_by_id(
    repo: &dyn RecommendationRepository,
    id: i32,
) -> AppResult<Recommendation> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recommendation {} not found", id)))
}

/// One recommendation drawn with a bias towards well-liked entries
///
/// See [`pick_weighted`] for the weighting.
pub async fn get_random(repo: &dyn RecommendationRepository) -> AppResult<Recommendation> {
    let all = repo.list_all().await?;

    // thread_rng is not Send, keep it out of any await
    let picked = pick_weighted(&all, &mut rand::thread_rng()).cloned();

    picked.ok_or_else(|| AppError::NotFound("There are no recommendations yet".to_string()))
}

/// Picks one recommendation from two weighted buckets
///
/// Recommendations scoring above [`POPULAR_THRESHOLD`] form the popular bucket, drawn
/// from with probability [`POPULAR_PROBABILITY`]; everything else forms the other
/// bucket. An empty chosen bucket falls back to the other one. The pick inside a
/// bucket is uniform. Returns `None` only for an empty slice.
pub fn pick_weighted<'a, R: Rng>(
    recommendations: &'a [Recommendation],
    rng: &mut R,
) -> Option<&'a Recommendation> {
    let (popular, others): (Vec<&Recommendation>, Vec<&Recommendation>) = recommendations
        .iter()
        .partition(|r| r.score > POPULAR_THRESHOLD);

    let prefer_popular = rng.gen::<f64>() < POPULAR_PROBABILITY;
    let bucket = match (prefer_popular, popular.is_empty(), others.is_empty()) {
        (true, false, _) | (false, false, true) => popular,
        (false, _, false) | (true, true, false) => others,
        _ => return None,
    };

    let index = rng.gen_range(0..bucket.len());
    Some(bucket[index])
}
