use crate::{
    db::RecommendationRepository,
    error::{AppError, AppResult},
    models::{NewRecommendation, Recommendation},
    services::link_validator::{validate_name, validate_youtube_link},
};

/// Validates and stores a new recommendation with a score of 0
///
/// Fails with [`AppError::Validation`] for a blank name or a link that is not a
/// YouTube video, and with [`AppError::Conflict`] when the name is already taken.
/// The link is checked before the name lookup, so a bad link is reported even for a
/// duplicate name.
pub async fn create(
    repo: &dyn RecommendationRepository,
    new: NewRecommendation,
) -> AppResult<Recommendation> {
    let name = new.name.trim().to_string();
    validate_name(&name)?;
    validate_youtube_link(&new.youtube_link)?;

    if repo.find_by_name(&name).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Recommendation '{}' already exists",
            name
        )));
    }

    // The store still enforces uniqueness for concurrent submissions
    let recommendation = repo
        .create(NewRecommendation {
            name,
            youtube_link: new.youtube_link.trim().to_string(),
        })
        .await?;

    tracing::info!(
        recommendation_id = recommendation.id,
        name = %recommendation.name,
        "Recommendation created"
    );

    Ok(recommendation)
}

/// Deletes every recommendation
///
/// Used to reset environments between end-to-end runs. Resetting an empty store is a no-op.
pub async fn reset(repo: &dyn RecommendationRepository) -> AppResult<u64> {
    let removed = repo.delete_all().await?;
    tracing::warn!(removed, backend = repo.name(), "All recommendations deleted");
    Ok(removed)
}
