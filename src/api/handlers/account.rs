use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Uri},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::{load_movie_view, MovieView};
use crate::{
    api::{auth::AuthUser, session::Session, AppState},
    error::{AppError, AppResult},
    models::{
        invalid_choice, MovieDetails, MovieId, UserId, ValidationErrors, WatchListEntry,
        WatchStatus,
    },
    services::movie_lookup::get_movie_details,
};

/// Raw add-to-list submission
#[derive(Debug, Default, Deserialize)]
pub struct AddToListForm {
    pub movie_id: Option<String>,
    pub status: Option<String>,
}

impl AddToListForm {
    pub fn validate(&self) -> Result<(MovieId, WatchStatus), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let movie_id = match self.movie_id.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("movie_id", "This field is required.");
                None
            }
            Some(raw) => match raw.parse::<MovieId>() {
                Ok(id) if id > 0 => Some(id),
                _ => {
                    errors.add("movie_id", "Enter a valid movie id.");
                    None
                }
            },
        };

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("status", "This field is required.");
                None
            }
            Some(raw) => match raw.parse::<WatchStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", invalid_choice(raw));
                    None
                }
            },
        };

        match (movie_id, status) {
            (Some(movie_id), Some(status)) if errors.is_empty() => Ok((movie_id, status)),
            _ => Err(errors),
        }
    }
}

/// Submission naming one of the user's list entries
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    pub entry_id: Option<String>,
}

impl EntryForm {
    pub fn validate(&self) -> Result<i64, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        match self.entry_id.as_deref().map(str::trim) {
            None | Some("") => errors.add("entry_id", "This field is required."),
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => return Ok(id),
                Err(_) => errors.add("entry_id", "Enter a whole number."),
            },
        }
        Err(errors)
    }
}

#[derive(Debug, Serialize)]
pub struct ListItem {
    pub entry: WatchListEntry,
    pub movie: MovieDetails,
}

#[derive(Debug, Serialize)]
pub struct ProfileDocument {
    pub user_id: UserId,
    pub avatar_choice: u8,
    pub avatar: String,
    pub watch_later: Vec<ListItem>,
    pub watched: Vec<ListItem>,
    pub watch_later_count: usize,
    pub watched_count: usize,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MyMovieDocument {
    #[serde(flatten)]
    pub view: MovieView,
    pub entry: WatchListEntry,
    pub status_label: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmDeleteDocument {
    pub user_id: UserId,
    pub confirm: &'static str,
    pub action: &'static str,
}

/// Same-site path of the referring page, if it sent one
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let uri: Uri = headers.get(header::REFERER)?.to_str().ok()?.parse().ok()?;
    let path = uri.path_and_query()?.as_str();
    (path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}

/// Attaches movie details to each entry, skipping movies the provider no longer knows
async fn with_details(state: &AppState, entries: Vec<WatchListEntry>) -> Vec<ListItem> {
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match get_movie_details(state.provider.as_ref(), entry.movie_id).await {
            Some(movie) => items.push(ListItem { entry, movie }),
            None => tracing::debug!(
                movie_id = entry.movie_id,
                "Skipping list entry without details"
            ),
        }
    }
    items
}

/// Adds a movie to the user's list, or changes its status
pub async fn add_to_list(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    mut session: Session,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<AddToListForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let (movie_id, status) = form.validate().map_err(AppError::Validation)?;

    let entry = state.lists.upsert(user_id, movie_id, status).await?;
    tracing::info!(user_id, movie_id, status = %entry.status, "List entry saved");

    session.data.flash("Movie list updated successfully!");
    let jar = session.commit(&state, jar).await?;

    let target = referer_path(&headers).unwrap_or_else(|| "/find".to_string());
    Ok((jar, Redirect::to(&target)))
}

/// The user's profile and both lists
pub async fn profile(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ProfileDocument>)> {
    let profile = state.profiles.ensure_profile(user_id).await?;

    let watch_later = state.lists.entries(user_id, WatchStatus::WatchLater).await?;
    let watched = state.lists.entries(user_id, WatchStatus::Watched).await?;

    // Counts cover stored entries, including those whose details are unavailable
    let watch_later_count = watch_later.len();
    let watched_count = watched.len();

    let watch_later = with_details(&state, watch_later).await;
    let watched = with_details(&state, watched).await;

    let messages = session.data.take_messages();
    let jar = session.commit(&state, jar).await?;

    Ok((
        jar,
        Json(ProfileDocument {
            user_id,
            avatar_choice: profile.avatar_choice,
            avatar: profile.avatar_path(),
            watch_later_count,
            watched_count,
            watch_later,
            watched,
            messages,
        }),
    ))
}

/// A movie from the user's list, with its entry
pub async fn my_movie_details(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    Path(movie_id): Path<MovieId>,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MyMovieDocument>)> {
    let entry = state
        .lists
        .find_by_movie(user_id, movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie is not in your list.".to_string()))?;
    let view = load_movie_view(&state, movie_id).await?;

    let messages = session.data.take_messages();
    let jar = session.commit(&state, jar).await?;

    Ok((
        jar,
        Json(MyMovieDocument {
            view,
            status_label: entry.status.label(),
            entry,
            messages,
        }),
    ))
}

pub async fn delete_from_list(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    mut session: Session,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let entry_id = form.validate().map_err(AppError::Validation)?;

    state.lists.remove(user_id, entry_id).await?;
    tracing::info!(user_id, entry_id, "List entry removed");

    session.data.flash("Movie list updated successfully!");
    let jar = session.commit(&state, jar).await?;
    Ok((jar, Redirect::to("/profile")))
}

pub async fn move_to_watched(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    mut session: Session,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let entry_id = form.validate().map_err(AppError::Validation)?;

    let entry = state.lists.set_watched(user_id, entry_id).await?;
    tracing::info!(user_id, entry_id, movie_id = entry.movie_id, "List entry marked watched");

    session.data.flash("Movie marked as watched!");
    let jar = session.commit(&state, jar).await?;
    Ok((jar, Redirect::to(&format!("/my-movie/{}", entry.movie_id))))
}

pub async fn confirm_delete_profile(AuthUser { user_id }: AuthUser) -> Json<ConfirmDeleteDocument> {
    Json(ConfirmDeleteDocument {
        user_id,
        confirm: "Are you sure you want to delete your account? This cannot be undone.",
        action: "/profile/delete",
    })
}

/// Deletes the profile and every list entry, then starts a new session
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser { user_id }: AuthUser,
    mut session: Session,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let removed = state.profiles.delete_account(user_id).await?;
    tracing::info!(user_id, removed_entries = removed, "Account deleted");

    session.rotate(&state).await?;
    session.data.flash("Your account has been successfully deleted.");
    let jar = session.commit(&state, jar).await?;
    Ok((jar, Redirect::to("/")))
}
