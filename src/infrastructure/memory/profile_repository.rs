//! In-memory profile repository.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ProfileRepository, UserProfile};
use crate::shared::error::AppError;

#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: DashMap<i64, UserProfile>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.get(&user_id).map(|p| p.clone()))
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<UserProfile, AppError> {
        self.profiles.insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }
}
