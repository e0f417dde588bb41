use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{self, account, browse};
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(browse_routes())
        .merge(account_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Search and recommendation pages, open to anonymous sessions
fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(browse::landing))
        .route("/find", get(browse::search_form).post(browse::submit_search))
        .route("/movie/:id", get(browse::show_movie))
        .route("/next", get(browse::next_movie))
}

/// Routes that require the identity header
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/list/add", post(account::add_to_list))
        .route("/list/delete", post(account::delete_from_list))
        .route("/list/move-to-watched", post(account::move_to_watched))
        .route("/profile", get(account::profile))
        .route(
            "/profile/delete",
            get(account::confirm_delete_profile).post(account::delete_profile),
        )
        .route("/my-movie/:id", get(account::my_movie_details))
}
