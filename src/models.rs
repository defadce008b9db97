//! Data models for Cinegrid

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Favorites,
    Movie(i64),
    Person(i64),
}

/// Movie record as returned by TMDB list and detail endpoints.
///
/// Favorites store full copies of this struct, so any field added here is
/// also persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl Movie {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(release_year)
    }

    pub fn rating_label(&self) -> String {
        format!("★ {:.1}", self.vote_average)
    }
}

/// Movie entry from a person's filmography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// Category buttons on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Anime,
    Genre(u32),
}

pub const CATEGORIES: &[(Category, &str)] = &[
    (Category::Anime, "Anime"),
    (Category::Genre(28), "Action"),
    (Category::Genre(12), "Adventure"),
    (Category::Genre(35), "Comedy"),
    (Category::Genre(27), "Horror"),
    (Category::Genre(878), "Sci-Fi"),
    (Category::Genre(10749), "Romance"),
    (Category::Genre(53), "Thriller"),
];

/// Year of a TMDB release date. Accepts full dates, `YYYY-MM` and bare years.
pub fn release_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed.year());
    }
    date.get(..4).and_then(|y| y.parse().ok())
}

/// Format a runtime in minutes as `2h 15min`
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_variants() {
        assert_eq!(release_year("2008-07-16"), Some(2008));
        assert_eq!(release_year("1999-03"), Some(1999));
        assert_eq!(release_year("2024"), Some(2024));
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("soon"), None);
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(135), "2h 15min");
        assert_eq!(format_runtime(59), "0h 59min");
        assert_eq!(format_runtime(120), "2h 0min");
    }

    #[test]
    fn test_movie_tolerates_missing_fields() {
        let movie: Movie = serde_json::from_str(r#"{"id": 7, "poster_path": null}"#).unwrap();
        assert_eq!(movie.id, 7);
        assert_eq!(movie.title, "");
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.vote_average, 0.0);
        assert_eq!(movie.year(), None);
        assert_eq!(movie.rating_label(), "★ 0.0");
    }

    #[test]
    fn test_credited_movie_flattens() {
        let json = r#"{"id": 3, "title": "Heat", "character": "Neil", "popularity": 41.5}"#;
        let credit: CreditedMovie = serde_json::from_str(json).unwrap();
        assert_eq!(credit.movie.title, "Heat");
        assert_eq!(credit.character.as_deref(), Some("Neil"));
        assert_eq!(credit.popularity, 41.5);
    }

    #[test]
    fn test_video_type_field() {
        let video: Video =
            serde_json::from_str(r#"{"key": "abc", "site": "YouTube", "type": "Trailer"}"#).unwrap();
        assert_eq!(video.kind, "Trailer");
    }
}
