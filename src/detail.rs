//! Movie and person detail pages
//!
//! Detail pages always fetch by id; nothing is reused from the home grid.

use tracing::warn;

use crate::api::{trailer_key, TmdbClient};
use crate::error::ApiError;
use crate::models::{CastMember, CreditedMovie, Movie, Person};

/// How many cast members the movie page lists
pub const CAST_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub movie: Movie,
    pub cast: Vec<CastMember>,
    pub trailer_key: Option<String>,
    pub similar: Vec<Movie>,
}

#[derive(Debug, Clone)]
pub struct PersonDetail {
    pub person: Person,
    pub credits: Vec<CreditedMovie>,
}

/// Load state of the currently open detail page
#[derive(Debug, Clone, Default)]
pub enum DetailState<T> {
    #[default]
    Idle,
    Loading(i64),
    Loaded(i64, Box<T>),
    Failed(i64),
}

impl<T> DetailState<T> {
    pub fn is_for(&self, id: i64) -> bool {
        match self {
            DetailState::Idle => false,
            DetailState::Loading(current) | DetailState::Failed(current) => *current == id,
            DetailState::Loaded(current, _) => *current == id,
        }
    }

    /// Store a finished load, unless the page has since moved to another id
    pub fn finish(&mut self, id: i64, result: Result<T, ApiError>) -> bool {
        if !matches!(self, DetailState::Loading(current) if *current == id) {
            return false;
        }
        *self = match result {
            Ok(detail) => DetailState::Loaded(id, Box::new(detail)),
            Err(_) => DetailState::Failed(id),
        };
        true
    }
}

/// Fetch a movie with its cast, trailer and similar titles.
/// Only the movie itself is required; the rest fall back to empty.
pub fn load_movie(client: &TmdbClient, id: i64) -> Result<MovieDetail, ApiError> {
    let movie = client.movie_details(id)?;

    let cast = client
        .movie_credits(id)
        .map(|mut cast| {
            cast.truncate(CAST_LIMIT);
            cast
        })
        .unwrap_or_else(|e| {
            warn!(movie = id, "credits unavailable: {}", e);
            Vec::new()
        });

    let trailer_key = client
        .movie_videos(id)
        .map(|videos| trailer_key(&videos))
        .unwrap_or_else(|e| {
            warn!(movie = id, "videos unavailable: {}", e);
            None
        });

    let similar = client.similar_movies(id).unwrap_or_else(|e| {
        warn!(movie = id, "similar titles unavailable: {}", e);
        Vec::new()
    });

    Ok(MovieDetail { movie, cast, trailer_key, similar })
}

pub fn load_person(client: &TmdbClient, id: i64) -> Result<PersonDetail, ApiError> {
    let person = client.person_details(id)?;
    let credits = client.person_movie_credits(id).unwrap_or_else(|e| {
        warn!(person = id, "credits unavailable: {}", e);
        Vec::new()
    });
    Ok(PersonDetail { person, credits: sort_by_popularity(credits) })
}

/// Most popular first
pub fn sort_by_popularity(mut credits: Vec<CreditedMovie>) -> Vec<CreditedMovie> {
    credits.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    credits
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn credit(id: i64, popularity: f64) -> CreditedMovie {
        serde_json::from_value(json!({"id": id, "title": "t", "popularity": popularity})).unwrap()
    }

    #[test]
    fn test_sort_by_popularity() {
        let sorted = sort_by_popularity(vec![credit(1, 2.0), credit(2, 50.5), credit(3, 10.0)]);
        let ids: Vec<i64> = sorted.iter().map(|c| c.movie.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_finish_ignores_other_ids() {
        let mut state: DetailState<u32> = DetailState::Loading(5);
        assert!(!state.finish(4, Ok(1)));
        assert!(state.is_for(5));
        assert!(state.finish(5, Ok(1)));
        assert!(matches!(state, DetailState::Loaded(5, _)));
        // Already settled
        assert!(!state.finish(5, Ok(2)));

        let mut state: DetailState<u32> = DetailState::Loading(9);
        assert!(state.finish(9, Err(ApiError::Http(404))));
        assert!(matches!(state, DetailState::Failed(9)));
    }

    #[tokio::test]
    async fn test_load_movie_degrades_secondary_fetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/550"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 550, "title": "Fight Club", "runtime": 139, "backdrop_path": "/b.jpg"
            })))
            .mount(&server)
            .await;
        let cast: Vec<_> = (0..15)
            .map(|i| json!({"id": i, "name": format!("Actor {}", i), "character": "x"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/movie/550/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cast": cast})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/550/videos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/550/similar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 807, "title": "Se7en"}]})))
            .mount(&server)
            .await;

        let client = TmdbClient::new("k", "en-US").with_base_url(&server.uri());
        let detail = tokio::task::spawn_blocking(move || load_movie(&client, 550))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.movie.runtime, Some(139));
        assert_eq!(detail.cast.len(), CAST_LIMIT);
        assert_eq!(detail.trailer_key, None);
        assert_eq!(detail.similar[0].id, 807);
    }

    #[tokio::test]
    async fn test_load_movie_requires_movie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = TmdbClient::new("k", "en-US").with_base_url(&server.uri());
        let result = tokio::task::spawn_blocking(move || load_movie(&client, 1)).await.unwrap();
        assert!(matches!(result, Err(ApiError::Http(404))));
    }
}
