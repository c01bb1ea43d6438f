use std::sync::Arc;

use crate::db::{InMemoryRecommendationRepository, RecommendationRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn RecommendationRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn RecommendationRepository>) -> Self {
        Self { repository }
    }

    /// State backed by a fresh, empty in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRecommendationRepository::new()))
    }

    /// The store as a trait object reference for service calls
    pub fn repo(&self) -> &dyn RecommendationRepository {
        self.repository.as_ref()
    }
}
