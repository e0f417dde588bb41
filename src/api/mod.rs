pub mod auth;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, Settings};
