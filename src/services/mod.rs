pub mod discovery;
pub mod movie_lookup;
pub mod providers;
pub mod recommendations;

pub use providers::{MovieProvider, TmdbProvider};
