/// TMDB v3 provider
///
/// Endpoints used:
/// 1. Discover: /discover/movie → paged summaries, filtered and sorted by popularity
/// 2. Details: /movie/{id} → full record (cached)
/// 3. Credits: /movie/{id}/credits → reduced to top cast + director (cached)
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CreditsResponse, DiscoverPage, FilterCriteria, MovieCredits, MovieDetails, MovieId,
    },
    services::providers::MovieProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::instrument;

/// Only movies with at least this many votes are discovered
const MIN_VOTE_COUNT: u32 = 100;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, cache_ttl: u64) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    /// Discover query parameters for `criteria`, without the API key.
    /// Unset criteria never produce a parameter.
    pub fn discover_params(criteria: &FilterCriteria, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
            ("page", page.to_string()),
        ];

        if let Some(genre) = criteria.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = criteria.year_from {
            params.push(("primary_release_date.gte", format!("{}-01-01", year)));
        }
        if let Some(year) = criteria.year_to {
            params.push(("primary_release_date.lte", format!("{}-12-31", year)));
        }
        if let Some(rating) = criteria.min_rating {
            params.push(("vote_average.gte", rating.to_string()));
        }
        if let Some(language) = &criteria.language {
            params.push(("with_original_language", language.clone()));
        }

        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(path = %path, response = %body, "Undecodable TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response for {}: {}", path, e))
        })
    }

    async fn fetch_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        let details: MovieDetails = self.get_json(&format!("/movie/{}", movie_id), &[]).await?;
        tracing::info!(movie_id, provider = "tmdb", "Movie details fetched");
        Ok(details)
    }

    async fn fetch_credits(&self, movie_id: MovieId) -> AppResult<MovieCredits> {
        let response: CreditsResponse = self
            .get_json(&format!("/movie/{}/credits", movie_id), &[])
            .await?;
        let credits = MovieCredits::from(response);
        tracing::info!(
            movie_id,
            cast = credits.cast.len(),
            has_director = credits.director.is_some(),
            provider = "tmdb",
            "Movie credits fetched"
        );
        Ok(credits)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn discover(&self, criteria: &FilterCriteria, page: u32) -> AppResult<DiscoverPage> {
        let params = Self::discover_params(criteria, page);
        let page: DiscoverPage = self.get_json("/discover/movie", &params).await?;

        tracing::info!(
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            "Discover page fetched"
        );

        Ok(page)
    }

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            self.cache_ttl,
            self.fetch_details(movie_id)
        )
    }

    async fn movie_credits(&self, movie_id: MovieId) -> AppResult<MovieCredits> {
        cached!(
            self.cache,
            CacheKey::MovieCredits(movie_id),
            self.cache_ttl,
            self.fetch_credits(movie_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
