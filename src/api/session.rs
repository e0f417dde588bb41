use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use uuid::Uuid;

use super::AppState;
use crate::{db::CacheKey, error::AppResult, models::SessionData};

pub const SESSION_COOKIE: &str = "pickamovie_session";

/// Browsing session identified by a cookie, with its data loaded from the cache.
///
/// Changes are only kept once [`Session::commit`] is called. A request without
/// a usable cookie, or whose data has expired, gets a fresh empty session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    pub data: SessionData,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let existing = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        let Some(id) = existing else {
            return Ok(Session::fresh());
        };

        match state.cache.get_from_cache::<SessionData>(&CacheKey::Session(id)).await {
            Ok(Some(data)) => Ok(Session { id, data }),
            Ok(None) => Ok(Session::fresh()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    session_id = %id,
                    "Failed to load session, starting a new one"
                );
                Ok(Session::fresh())
            }
        }
    }
}

impl Session {
    fn fresh() -> Self {
        Session {
            id: Uuid::new_v4(),
            data: SessionData::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Persists the session and sets its cookie on `jar`
    pub async fn commit(&self, state: &AppState, jar: CookieJar) -> AppResult<CookieJar> {
        let ttl = state.settings.session_ttl_secs;
        state
            .cache
            .set(&CacheKey::Session(self.id), &self.data, ttl)
            .await?;

        let cookie = Cookie::build((SESSION_COOKIE, self.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(state.settings.secure_cookies)
            .max_age(time::Duration::seconds(ttl as i64))
            .build();

        Ok(jar.add(cookie))
    }

    /// Discards all stored data and continues under a new id
    pub async fn rotate(&mut self, state: &AppState) -> AppResult<()> {
        state.cache.remove(&CacheKey::Session(self.id)).await?;
        *self = Session::fresh();
        Ok(())
    }
}
