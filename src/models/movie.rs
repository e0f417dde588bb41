use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// TMDB movie id
pub type MovieId = i64;

/// A discover result. Only the id is interpreted; everything else is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of discover results
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// Full movie record from `/movie/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cast or crew member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw `/movie/{id}/credits` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<Person>,
    #[serde(default)]
    pub crew: Vec<Person>,
}

/// Billed cast and director, as shown next to a movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieCredits {
    pub cast: Vec<Person>,
    pub director: Option<Person>,
}

/// Number of billed cast members kept per movie
pub const TOP_CAST: usize = 3;

impl From<CreditsResponse> for MovieCredits {
    fn from(mut response: CreditsResponse) -> Self {
        response.cast.truncate(TOP_CAST);
        // First director in provider order wins
        let director = response
            .crew
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"));

        Self {
            cast: response.cast,
            director,
        }
    }
}
