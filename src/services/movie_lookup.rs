use crate::{
    models::{MovieCredits, MovieDetails, MovieId},
    services::providers::MovieProvider,
};

/// Movie record, or `None` when the provider cannot supply it
pub async fn get_movie_details(
    provider: &dyn MovieProvider,
    movie_id: MovieId,
) -> Option<MovieDetails> {
    match provider.movie_details(movie_id).await {
        Ok(details) => Some(details),
        Err(e) => {
            tracing::warn!(
                error = %e,
                movie_id,
                provider = provider.name(),
                "Movie details lookup failed"
            );
            None
        }
    }
}

/// Top cast and director. Falls back to empty credits so callers can render unconditionally.
pub async fn get_movie_credits(provider: &dyn MovieProvider, movie_id: MovieId) -> MovieCredits {
    match provider.movie_credits(movie_id).await {
        Ok(credits) => credits,
        Err(e) => {
            tracing::warn!(
                error = %e,
                movie_id,
                provider = provider.name(),
                "Movie credits lookup failed"
            );
            MovieCredits::default()
        }
    }
}
