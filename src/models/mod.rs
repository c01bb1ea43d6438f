use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted piece of music with its community score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: i32,
    pub name: String,
    pub youtube_link: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for submitting a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    pub name: String,
    pub youtube_link: String,
}

impl NewRecommendation {
    pub fn new(name: impl Into<String>, youtube_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            youtube_link: youtube_link.into(),
        }
    }
}

/// Result of an atomic score adjustment on a stored recommendation
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreChange {
    /// The record survived with its new score
    Updated(Recommendation),
    /// The new score fell below the floor and the record was deleted.
    /// Carries the record as it looked right before deletion.
    Removed(Recommendation),
}
