use rand::Rng;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Avatar selectors are 1..=AVATAR_COUNT
pub const AVATAR_COUNT: u8 = 6;

/// Per-user profile, created on first access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub avatar_choice: u8,
}

impl UserProfile {
    /// New profile with a uniformly random avatar
    pub fn with_random_avatar(user_id: UserId) -> Self {
        Self {
            user_id,
            avatar_choice: rand::thread_rng().gen_range(1..=AVATAR_COUNT),
        }
    }

    pub fn avatar_path(&self) -> String {
        format!("avatars/avatar{}.png", self.avatar_choice)
    }
}
