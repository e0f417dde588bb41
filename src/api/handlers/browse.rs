use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::{load_movie_view, MovieView};
use crate::{
    api::{session::Session, AppState},
    error::{AppError, AppResult},
    models::{Advance, FilterForm, MovieId, GENRES, LANGUAGES, MIN_RATINGS},
    services::recommendations,
};

#[derive(Debug, Serialize)]
pub struct LandingDocument {
    pub name: &'static str,
    pub search: &'static str,
    pub profile: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

/// Choices offered by the search form. The blank value means "any".
#[derive(Debug, Serialize)]
pub struct SearchFormDocument {
    pub genres: Vec<Choice>,
    pub ratings: Vec<Choice>,
    pub languages: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub messages: Vec<String>,
}

impl SearchFormDocument {
    fn new(notice: Option<String>, messages: Vec<String>) -> Self {
        let genres = std::iter::once(Choice::new("", "Any Genre"))
            .chain(GENRES.iter().map(|(id, name)| Choice::new(id, *name)))
            .collect();
        let ratings = std::iter::once(Choice::new("", "Any Rating"))
            .chain(MIN_RATINGS.iter().map(|r| Choice::new(r, format!("{}+", r))))
            .collect();
        let languages = std::iter::once(Choice::new("", "Any Language"))
            .chain(LANGUAGES.iter().map(|(code, name)| Choice::new(code, *name)))
            .collect();

        Self {
            genres,
            ratings,
            languages,
            notice,
            messages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationDocument {
    #[serde(flatten)]
    pub view: MovieView,
    pub queued: usize,
    pub messages: Vec<String>,
}

/// Landing page
pub async fn landing(
    State(state): State<AppState>,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<LandingDocument>)> {
    let messages = session.data.take_messages();
    let jar = session.commit(&state, jar).await?;

    Ok((
        jar,
        Json(LandingDocument {
            name: "pickamovie",
            search: "/find",
            profile: "/profile",
            messages,
        }),
    ))
}

/// Empty search form
pub async fn search_form(
    State(state): State<AppState>,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<SearchFormDocument>)> {
    let messages = session.data.take_messages();
    let jar = session.commit(&state, jar).await?;
    Ok((jar, Json(SearchFormDocument::new(None, messages))))
}

/// Runs a search and redirects to the first recommendation
pub async fn submit_search(
    State(state): State<AppState>,
    mut session: Session,
    jar: CookieJar,
    Form(form): Form<FilterForm>,
) -> AppResult<Response> {
    let criteria = form.validate().map_err(AppError::Validation)?;

    tracing::info!(criteria = ?criteria, session_id = %session.id(), "Processing search");

    let first =
        recommendations::start_search(state.provider.as_ref(), &mut session.data, &criteria).await;

    match first {
        Some(first) => {
            let jar = session.commit(&state, jar).await?;
            Ok((jar, Redirect::to(&format!("/movie/{}", first))).into_response())
        }
        None => {
            let messages = session.data.take_messages();
            let jar = session.commit(&state, jar).await?;
            let notice = "No movies matched those filters. Try widening your search.".to_string();
            Ok((jar, Json(SearchFormDocument::new(Some(notice), messages))).into_response())
        }
    }
}

/// Current recommendation
pub async fn show_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<RecommendationDocument>)> {
    let view = load_movie_view(&state, movie_id).await?;

    let messages = session.data.take_messages();
    let queued = session.data.queue.len();
    let jar = session.commit(&state, jar).await?;

    Ok((
        jar,
        Json(RecommendationDocument {
            view,
            queued,
            messages,
        }),
    ))
}

/// Moves to the next queued recommendation, or back to the search form
pub async fn next_movie(
    State(state): State<AppState>,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let target = match recommendations::advance(&mut session.data) {
        Advance::Showing(id) => format!("/movie/{}", id),
        Advance::Exhausted => {
            tracing::info!(session_id = %session.id(), "Recommendation queue exhausted");
            "/find".to_string()
        }
    };

    let jar = session.commit(&state, jar).await?;
    Ok((jar, Redirect::to(&target)))
}
