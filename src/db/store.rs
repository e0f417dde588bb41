use crate::{
    error::AppResult,
    models::{MovieId, UserId, UserProfile, WatchListEntry, WatchStatus},
};

/// Per-user movie lists.
///
/// Every entry-id operation is scoped to the owning user: an entry that exists
/// but belongs to someone else is reported as `NotFound`, exactly like a
/// missing one.
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Insert, or overwrite the status of, the user's entry for `movie_id`
    async fn upsert(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        status: WatchStatus,
    ) -> AppResult<WatchListEntry>;

    /// The user's entries with `status`, oldest first
    async fn entries(&self, user_id: UserId, status: WatchStatus)
        -> AppResult<Vec<WatchListEntry>>;

    async fn find_by_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<WatchListEntry>>;

    async fn remove(&self, user_id: UserId, entry_id: i64) -> AppResult<()>;

    async fn set_watched(&self, user_id: UserId, entry_id: i64) -> AppResult<WatchListEntry>;

    /// Removes every entry of the user, returning how many were deleted
    async fn clear(&self, user_id: UserId) -> AppResult<u64>;
}

/// One profile per user, created on demand
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the profile, creating it with a random avatar if missing
    async fn ensure_profile(&self, user_id: UserId) -> AppResult<UserProfile>;

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()>;

    /// Removes the profile and every list entry of the user as one unit,
    /// returning how many entries were deleted
    async fn delete_account(&self, user_id: UserId) -> AppResult<u64>;
}

pub(crate) fn entry_not_found(entry_id: i64) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("List entry {} not found", entry_id))
}
