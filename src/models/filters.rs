use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// TMDB genre ids offered by the search form
pub const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Minimum average vote choices, highest first
pub const MIN_RATINGS: &[u8] = &[9, 8, 7, 6, 5, 4];

/// ISO 639-1 original-language choices
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh", "Mandarin Chinese"),
    ("hi", "Hindi"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("ru", "Russian"),
    ("pt", "Portuguese"),
    ("id", "Indonesian"),
    ("de", "German"),
    ("ja", "Japanese"),
    ("te", "Telugu"),
    ("tr", "Turkish"),
    ("ta", "Tamil"),
    ("cn", "Cantonese"),
    ("ko", "Korean"),
    ("vi", "Vietnamese"),
    ("it", "Italian"),
    ("gu", "Gujarati"),
    ("pl", "Polish"),
    ("uk", "Ukrainian"),
    ("fa", "Persian"),
    ("ml", "Malayalam"),
    ("pa", "Punjabi"),
    ("th", "Thai"),
    ("nl", "Dutch"),
    ("ro", "Romanian"),
    ("cs", "Czech"),
    ("el", "Greek"),
];

/// Display name for a language code, if it is one of the offered choices
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Validated search criteria. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub genre: Option<u32>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_rating: Option<u8>,
    pub language: Option<String>,
}

/// Raw search form as submitted. Every field arrives as text and may be blank.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterForm {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year_from: Option<String>,
    #[serde(default)]
    pub year_to: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Field name → error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn invalid_choice(raw: &str) -> String {
    format!("Select a valid choice. {} is not one of the available choices.", raw)
}

impl FilterForm {
    /// Validates the form into criteria, or reports every invalid field
    pub fn validate(&self) -> Result<FilterCriteria, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut criteria = FilterCriteria::default();

        if let Some(raw) = non_blank(&self.genre) {
            match raw.parse::<u32>() {
                Ok(id) if GENRES.iter().any(|(g, _)| *g == id) => criteria.genre = Some(id),
                _ => errors.add("genre", invalid_choice(raw)),
            }
        }

        for (field, raw, slot) in [
            ("year_from", non_blank(&self.year_from), &mut criteria.year_from),
            ("year_to", non_blank(&self.year_to), &mut criteria.year_to),
        ] {
            if let Some(raw) = raw {
                match raw.parse::<i32>() {
                    Ok(year) => *slot = Some(year),
                    Err(_) => errors.add(field, "Enter a whole number."),
                }
            }
        }

        if let Some(raw) = non_blank(&self.rating) {
            match raw.parse::<u8>() {
                Ok(rating) if MIN_RATINGS.contains(&rating) => {
                    criteria.min_rating = Some(rating)
                }
                _ => errors.add("rating", invalid_choice(raw)),
            }
        }

        if let Some(raw) = non_blank(&self.language) {
            if language_name(raw).is_some() {
                criteria.language = Some(raw.to_string());
            } else {
                errors.add("language", invalid_choice(raw));
            }
        }

        if errors.is_empty() {
            Ok(criteria)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(
        genre: &str,
        year_from: &str,
        year_to: &str,
        rating: &str,
        language: &str,
    ) -> FilterForm {
        let opt = |s: &str| Some(s.to_string());
        FilterForm {
            genre: opt(genre),
            year_from: opt(year_from),
            year_to: opt(year_to),
            rating: opt(rating),
            language: opt(language),
        }
    }

    #[test]
    fn test_blank_form_is_unconstrained() {
        let criteria = form("", "", "", "", "").validate().unwrap();
        assert_eq!(criteria, FilterCriteria::default());

        let criteria = FilterForm::default().validate().unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_full_form() {
        let criteria = form("28", "2020", "2023", "7", "ko").validate().unwrap();
        assert_eq!(criteria.genre, Some(28));
        assert_eq!(criteria.year_from, Some(2020));
        assert_eq!(criteria.year_to, Some(2023));
        assert_eq!(criteria.min_rating, Some(7));
        assert_eq!(criteria.language.as_deref(), Some("ko"));
    }

    #[test]
    fn test_unknown_choices_rejected() {
        let errors = form("1", "", "", "3", "xx").validate().unwrap_err();
        assert!(errors.field("genre").is_some());
        assert!(errors.field("rating").is_some());
        assert!(errors.field("language").is_some());
        assert!(errors.field("year_from").is_none());
    }

    #[test]
    fn test_non_numeric_years_rejected() {
        let errors = form("", "last year", "20x0", "", "").validate().unwrap_err();
        assert_eq!(errors.field("year_from").unwrap(), ["Enter a whole number."]);
        assert_eq!(errors.field("year_to").unwrap(), ["Enter a whole number."]);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("fr"), Some("French"));
        assert_eq!(language_name("zh"), Some("Mandarin Chinese"));
        assert_eq!(language_name("cn"), Some("Cantonese"));
        assert_eq!(language_name("xx"), None);
    }
}
