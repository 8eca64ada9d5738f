//! Profile Service
//!
//! Read and update the caller's own profile.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{ProfileRepository, UserProfile, MAX_BIO_LENGTH};
use crate::shared::error::AppError;

/// Profile service trait
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, ProfileError>;

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<UserProfile, ProfileError>;
}

/// Partial profile update. Absent fields are left alone; an empty string
/// clears the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{0}")]
    Invalid(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ProfileError {
    fn from(err: AppError) -> Self {
        ProfileError::Internal(err.to_string())
    }
}

pub struct ProfileServiceImpl {
    profile_repo: Arc<dyn ProfileRepository>,
}

impl ProfileServiceImpl {
    pub fn new(profile_repo: Arc<dyn ProfileRepository>) -> Self {
        Self { profile_repo }
    }
}

fn cleared(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    async fn get_profile(&self, user_id: i64) -> Result<UserProfile, ProfileError> {
        match self.profile_repo.find_by_user_id(user_id).await? {
            Some(profile) => Ok(profile),
            // Accounts created before profiles existed get one on first read
            None => Ok(self.profile_repo.upsert(&UserProfile::empty(user_id)).await?),
        }
    }

    async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<UserProfile, ProfileError> {
        if let Some(bio) = &update.bio {
            if bio.chars().count() > MAX_BIO_LENGTH {
                return Err(ProfileError::Invalid(format!(
                    "Bio must be at most {} characters",
                    MAX_BIO_LENGTH
                )));
            }
        }

        let mut profile = self.get_profile(user_id).await?;
        if let Some(bio) = update.bio {
            profile.bio = cleared(bio);
        }
        if let Some(avatar_url) = update.avatar_url {
            profile.avatar_url = cleared(avatar_url);
        }
        profile.updated_at = Utc::now();

        Ok(self.profile_repo.upsert(&profile).await?)
    }
}
