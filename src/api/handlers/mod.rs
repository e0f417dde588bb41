use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{language_name, MovieDetails, MovieId, Person},
    services::movie_lookup::{get_movie_credits, get_movie_details},
};

pub mod account;
pub mod browse;

/// A movie with everything shown alongside it
#[derive(Debug, Serialize)]
pub struct MovieView {
    pub movie: MovieDetails,
    pub cast: Vec<Person>,
    pub director: Option<Person>,
    pub full_language_name: Option<String>,
}

/// Looks up a movie and its credits; `NotFound` when the provider has no record
pub(crate) async fn load_movie_view(state: &AppState, movie_id: MovieId) -> AppResult<MovieView> {
    let movie = get_movie_details(state.provider.as_ref(), movie_id)
        .await
        .ok_or_else(|| AppError::NotFound("Movie not found.".to_string()))?;
    let credits = get_movie_credits(state.provider.as_ref(), movie_id).await;

    let full_language_name = movie
        .original_language
        .as_deref()
        .map(|code| language_name(code).unwrap_or(code).to_string());

    Ok(MovieView {
        movie,
        cast: credits.cast,
        director: credits.director,
        full_language_name,
    })
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
