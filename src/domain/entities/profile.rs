//! User profile entity and repository trait.
//!
//! Maps to the `user_profiles` table, a 1:1 extension of `users`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Maximum bio length in characters.
pub const MAX_BIO_LENGTH: usize = 500;

/// Profile data attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// An empty profile for a freshly registered user.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            bio: None,
            avatar_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Repository trait for UserProfile data access operations.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile of a user.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>, AppError>;

    /// Insert or replace the profile of a user.
    async fn upsert(&self, profile: &UserProfile) -> Result<UserProfile, AppError>;
}
