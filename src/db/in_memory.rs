use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{entry_not_found, ListStore, ProfileStore};
use crate::{
    error::AppResult,
    models::{MovieId, UserId, UserProfile, WatchListEntry, WatchStatus},
};

#[derive(Default)]
struct Inner {
    next_entry_id: i64,
    entries: Vec<WatchListEntry>,
    profiles: HashMap<UserId, UserProfile>,
}

/// Lists and profiles held in process memory, for development and tests
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ListStore for InMemoryStore {
    async fn upsert(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        status: WatchStatus,
    ) -> AppResult<WatchListEntry> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .entries
            .iter_mut()
            .find(|e| e.user_id == user_id && e.movie_id == movie_id)
        {
            existing.status = status;
            return Ok(existing.clone());
        }

        inner.next_entry_id += 1;
        let entry = WatchListEntry {
            id: inner.next_entry_id,
            user_id,
            movie_id,
            status,
            added_on: Utc::now(),
        };
        inner.entries.push(entry.clone());
        Ok(entry)
    }

    async fn entries(
        &self,
        user_id: UserId,
        status: WatchStatus,
    ) -> AppResult<Vec<WatchListEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<WatchListEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .find(|e| e.user_id == user_id && e.movie_id == movie_id)
            .cloned())
    }

    async fn remove(&self, user_id: UserId, entry_id: i64) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let position = inner
            .entries
            .iter()
            .position(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or_else(|| entry_not_found(entry_id))?;
        inner.entries.remove(position);
        Ok(())
    }

    async fn set_watched(&self, user_id: UserId, entry_id: i64) -> AppResult<WatchListEntry> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or_else(|| entry_not_found(entry_id))?;
        entry.status = WatchStatus::Watched;
        Ok(entry.clone())
    }

    async fn clear(&self, user_id: UserId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.user_id != user_id);
        Ok((before - inner.entries.len()) as u64)
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryStore {
    async fn ensure_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        let mut inner = self.inner.write().await;
        let profile = inner
            .profiles
            .entry(user_id)
            .or_insert_with(|| UserProfile::with_random_avatar(user_id));
        Ok(profile.clone())
    }

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()> {
        self.inner.write().await.profiles.remove(&user_id);
        Ok(())
    }

    async fn delete_account(&self, user_id: UserId) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.user_id != user_id);
        inner.profiles.remove(&user_id);
        Ok((before - inner.entries.len()) as u64)
    }
}
