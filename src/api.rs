//! TMDB API client

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{CastMember, CreditedMovie, Movie, Person, Video};
use crate::query::CatalogRequest;

const USER_AGENT: &str = concat!("cinegrid/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse<T> {
    #[serde(default = "Vec::new")]
    cast: Vec<T>,
}

/// Image renditions used by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Thumb,
    Profile,
    Original,
}

impl ImageSize {
    fn segment(self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Thumb => "w300",
            ImageSize::Profile => "w185",
            ImageSize::Original => "original",
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    agent: Agent,
    base_url: String,
    image_base_url: String,
    api_key: String,
    language: String,
    video_language: String,
}

impl TmdbClient {
    pub fn new(api_key: &str, language: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(10)))
            .timeout_global(Some(Duration::from_secs(30)))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            video_language: language.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_key.trim(), &config.language)
            .with_base_url(&config.api_base_url)
            .with_image_base_url(&config.image_base_url)
            .with_video_language(&config.video_language)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: &str) -> Self {
        self.image_base_url = image_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_video_language(mut self, language: &str) -> Self {
        self.video_language = language.to_string();
        self
    }

    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        format!("{}/{}{}", self.image_base_url, size.segment(), path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        language: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let mut request = self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .query("api_key", &self.api_key)
            .query("language", language);
        for (key, value) in params {
            request = request.query(*key, value);
        }

        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// One page of search or discovery results
    pub fn fetch_catalog(&self, request: &CatalogRequest) -> Result<Vec<Movie>, ApiError> {
        let list: ListResponse<Movie> =
            self.get_json(request.path(), &self.language, &request.params())?;
        Ok(list.results)
    }

    pub fn movie_details(&self, id: i64) -> Result<Movie, ApiError> {
        self.get_json(&format!("/movie/{}", id), &self.language, &[])
    }

    pub fn movie_videos(&self, id: i64) -> Result<Vec<Video>, ApiError> {
        let list: ListResponse<Video> =
            self.get_json(&format!("/movie/{}/videos", id), &self.video_language, &[])?;
        Ok(list.results)
    }

    pub fn movie_credits(&self, id: i64) -> Result<Vec<CastMember>, ApiError> {
        let credits: CreditsResponse<CastMember> =
            self.get_json(&format!("/movie/{}/credits", id), &self.language, &[])?;
        Ok(credits.cast)
    }

    pub fn similar_movies(&self, id: i64) -> Result<Vec<Movie>, ApiError> {
        let list: ListResponse<Movie> = self.get_json(
            &format!("/movie/{}/similar", id),
            &self.language,
            &[("page", "1".to_string())],
        )?;
        Ok(list.results)
    }

    pub fn person_details(&self, id: i64) -> Result<Person, ApiError> {
        self.get_json(&format!("/person/{}", id), &self.language, &[])
    }

    pub fn person_movie_credits(&self, id: i64) -> Result<Vec<CreditedMovie>, ApiError> {
        let credits: CreditsResponse<CreditedMovie> =
            self.get_json(&format!("/person/{}/movie_credits", id), &self.language, &[])?;
        Ok(credits.cast)
    }
}

/// Key of the first YouTube trailer, if any
pub fn trailer_key(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|v| v.kind == "Trailer" && v.site == "YouTube")
        .map(|v| v.key.clone())
}

pub fn youtube_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
