use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::store::{entry_not_found, ListStore, ProfileStore};
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, UserId, UserProfile, WatchListEntry, WatchStatus},
};

/// Column list for `watch_list_entries` queries.
const ENTRY_COLUMNS: &str = "id, user_id, movie_id, status, added_on";

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    user_id: i64,
    movie_id: i64,
    status: String,
    added_on: DateTime<Utc>,
}

impl TryFrom<EntryRow> for WatchListEntry {
    type Error = AppError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<WatchStatus>().map_err(AppError::Internal)?;
        Ok(WatchListEntry {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            status,
            added_on: row.added_on,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: i64,
    avatar_choice: i16,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            user_id: row.user_id,
            avatar_choice: row.avatar_choice as u8,
        }
    }
}

/// Lists and profiles stored in PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ListStore for PgStore {
    async fn upsert(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        status: WatchStatus,
    ) -> AppResult<WatchListEntry> {
        let query = format!(
            "INSERT INTO watch_list_entries (user_id, movie_id, status) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, movie_id) DO UPDATE SET status = EXCLUDED.status \
             RETURNING {ENTRY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id)
            .bind(movie_id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn entries(
        &self,
        user_id: UserId,
        status: WatchStatus,
    ) -> AppResult<Vec<WatchListEntry>> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM watch_list_entries \
             WHERE user_id = $1 AND status = $2 \
             ORDER BY added_on, id"
        );
        sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(WatchListEntry::try_from)
            .collect()
    }

    async fn find_by_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<WatchListEntry>> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM watch_list_entries \
             WHERE user_id = $1 AND movie_id = $2"
        );
        sqlx::query_as::<_, EntryRow>(&query)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?
            .map(WatchListEntry::try_from)
            .transpose()
    }

    async fn remove(&self, user_id: UserId, entry_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM watch_list_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(entry_not_found(entry_id));
        }
        Ok(())
    }

    async fn set_watched(&self, user_id: UserId, entry_id: i64) -> AppResult<WatchListEntry> {
        let query = format!(
            "UPDATE watch_list_entries SET status = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, EntryRow>(&query)
            .bind(entry_id)
            .bind(user_id)
            .bind(WatchStatus::Watched.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| entry_not_found(entry_id))?
            .try_into()
    }

    async fn clear(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM watch_list_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl ProfileStore for PgStore {
    async fn ensure_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        let candidate = UserProfile::with_random_avatar(user_id);

        sqlx::query(
            "INSERT INTO user_profiles (user_id, avatar_choice) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(candidate.avatar_choice as i16)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, avatar_choice FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_profile(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_account(&self, user_id: UserId) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM watch_list_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }
}
