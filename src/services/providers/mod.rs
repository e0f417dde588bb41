/// Movie metadata provider abstraction
///
/// The recommendation flow needs three lookups from the outside world: a
/// filtered, paged discover listing, a movie's full record, and its credits.
/// Providers return errors freely; the services layer decides how to degrade.
use crate::{
    error::AppResult,
    models::{DiscoverPage, FilterCriteria, MovieCredits, MovieDetails, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// One page of movies matching `criteria`, most popular first
    async fn discover(&self, criteria: &FilterCriteria, page: u32) -> AppResult<DiscoverPage>;

    /// Full record for a movie
    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// Billed cast (at most three) and director
    async fn movie_credits(&self, movie_id: MovieId) -> AppResult<MovieCredits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
