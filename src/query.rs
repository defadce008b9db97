//! Query filters and the catalog requests they translate to

use crate::models::Category;

/// TMDB genre id for animation
pub const ANIMATION_GENRE: u32 = 16;

/// The single active filter dimension of the home grid.
///
/// A text search and a category can never both be active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    None,
    Search(String),
    Genre(u32),
    Anime,
}

impl Filter {
    /// Filter for a settled search box value. An empty box means no filter.
    pub fn from_term(term: &str) -> Self {
        if term.is_empty() {
            Filter::None
        } else {
            Filter::Search(term.to_string())
        }
    }

    pub fn from_category(category: Category) -> Self {
        match category {
            Category::Anime => Filter::Anime,
            Category::Genre(id) => Filter::Genre(id),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Filter::Anime => Some(Category::Anime),
            Filter::Genre(id) => Some(Category::Genre(*id)),
            _ => None,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        match self {
            Filter::Search(term) => Some(term),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Filter::None => "popular".to_string(),
            Filter::Search(term) => format!("search '{}'", term),
            Filter::Genre(id) => format!("genre {}", id),
            Filter::Anime => "anime".to_string(),
        }
    }
}

/// One outbound list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Search { query: String, page: u32 },
    Discover { genre: Option<u32>, original_language: Option<&'static str>, page: u32 },
}

impl CatalogRequest {
    pub fn for_filter(filter: &Filter, page: u32) -> Self {
        match filter {
            Filter::Search(term) => CatalogRequest::Search { query: term.clone(), page },
            Filter::Anime => CatalogRequest::Discover {
                genre: Some(ANIMATION_GENRE),
                original_language: Some("ja"),
                page,
            },
            Filter::Genre(id) => CatalogRequest::Discover {
                genre: Some(*id),
                original_language: None,
                page,
            },
            Filter::None => CatalogRequest::Discover { genre: None, original_language: None, page },
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            CatalogRequest::Search { .. } => "/search/movie",
            CatalogRequest::Discover { .. } => "/discover/movie",
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            CatalogRequest::Search { page, .. } | CatalogRequest::Discover { page, .. } => *page,
        }
    }

    /// Endpoint-specific query parameters (credentials and language are added by the client)
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page().to_string())];
        match self {
            CatalogRequest::Search { query, .. } => {
                params.push(("query", query.clone()));
            }
            CatalogRequest::Discover { genre, original_language, .. } => {
                params.push(("sort_by", "popularity.desc".to_string()));
                if let Some(genre) = genre {
                    params.push(("with_genres", genre.to_string()));
                }
                if let Some(lang) = original_language {
                    params.push(("with_original_language", lang.to_string()));
                }
            }
        }
        params
    }
}
