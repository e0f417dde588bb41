mod filters;
mod movie;
mod profile;
mod queue;
mod session;
mod watch_list;

pub use filters::{
    language_name, FilterCriteria, FilterForm, ValidationErrors, GENRES, LANGUAGES, MIN_RATINGS,
};
pub use movie::{
    CreditsResponse, DiscoverPage, MovieCredits, MovieDetails, MovieId, MovieSummary, Person,
    TOP_CAST,
};
pub(crate) use filters::invalid_choice;
pub use profile::{UserProfile, AVATAR_COUNT};
pub use queue::{Advance, MovieQueue};
pub use session::SessionData;
pub use watch_list::{UserId, WatchListEntry, WatchStatus};
