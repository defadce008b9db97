//! Tests for search, category and favorites interplay

use super::*;
use crate::favorites::MemoryStorage;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn movie(id: i64) -> Movie {
    Movie {
        id,
        title: format!("Movie {}", id),
        poster_path: Some(format!("/{}.jpg", id)),
        backdrop_path: None,
        vote_average: 5.0,
        release_date: None,
        overview: None,
        runtime: None,
    }
}

fn movies(ids: std::ops::Range<i64>) -> Vec<Movie> {
    ids.map(movie).collect()
}

fn state() -> AppState {
    AppState::init(AppConfig::default(), Box::new(MemoryStorage::default()))
}

/// Feed keystrokes and drain every fetch `tick` produces up to `until`
fn type_and_collect(
    state: &mut AppState,
    keys: &[(u64, &str)],
    t0: Instant,
    until: u64,
) -> Vec<CatalogRequest> {
    let mut fetches = Vec::new();
    let mut keys = keys.iter().peekable();
    for now_ms in (0..=until).step_by(10) {
        while let Some((at, text)) = keys.peek() {
            if *at > now_ms {
                break;
            }
            state.set_search_input(text.to_string(), t0 + ms(*at));
            keys.next();
        }
        if let Some((_, request)) = state.tick(t0 + ms(now_ms)) {
            fetches.push(request);
        }
    }
    fetches
}

#[test]
fn test_refresh_fetches_popular() {
    let mut state = state();
    let (ticket, request) = state.refresh();
    assert_eq!(request, CatalogRequest::for_filter(&Filter::None, 1));
    assert!(state.is_loading());
    state.apply(ticket, Ok(movies(1..21)));
    assert_eq!(state.results().len(), 20);
}

#[test]
fn test_batman_replaced_by_robin_fetches_once() {
    let mut state = state();
    let t0 = Instant::now();
    let keys = [(0, "batman"), (200, ""), (350, "robin")];
    let fetches = type_and_collect(&mut state, &keys, t0, 2000);

    assert_eq!(fetches, vec![CatalogRequest::for_filter(&Filter::Search("robin".into()), 1)]);
    assert_eq!(state.filter(), &Filter::Search("robin".into()));
}

#[test]
fn test_search_waits_for_quiet_period() {
    let mut state = state();
    let t0 = Instant::now();
    state.set_search_input("dune".into(), t0);
    assert!(state.tick(t0 + ms(499)).is_none());
    assert_eq!(state.next_wakeup(t0 + ms(400)), Some(ms(100)));
    assert!(state.tick(t0 + ms(500)).is_some());
    assert!(state.tick(t0 + ms(2000)).is_none());
}

#[test]
fn test_enter_submits_immediately() {
    let mut state = state();
    let t0 = Instant::now();
    state.set_search_input("alien".into(), t0);
    let (_, request) = state.submit_search().unwrap();
    assert_eq!(request, CatalogRequest::for_filter(&Filter::Search("alien".into()), 1));
    assert!(state.tick(t0 + ms(1000)).is_none());
}

#[test]
fn test_category_replaces_popular_list() {
    let mut state = state();
    let (ticket, _) = state.refresh();
    state.apply(ticket, Ok(movies(1..21)));

    let (ticket, request) = state.select_category(Category::Genre(28));
    assert_eq!(request, CatalogRequest::for_filter(&Filter::Genre(28), 1));
    assert!(state.results().is_empty());
    assert!(state.is_loading());

    state.apply(ticket, Ok(movies(100..120)));
    let ids: Vec<i64> = state.results().iter().map(|m| m.id).collect();
    assert_eq!(ids, (100..120).collect::<Vec<_>>());
}

#[test]
fn test_category_clears_search_and_vice_versa() {
    let mut state = state();
    let t0 = Instant::now();

    state.set_search_input("matrix".into(), t0);
    state.tick(t0 + ms(600));
    assert_eq!(state.filter(), &Filter::Search("matrix".into()));

    state.select_category(Category::Anime);
    assert_eq!(state.search_input(), "");
    assert_eq!(state.filter(), &Filter::Anime);
    // The cleared search box must not fire a popular fetch later
    assert!(state.tick(t0 + ms(5000)).is_none());

    state.set_search_input("t".into(), t0 + ms(6000));
    assert_eq!(state.active_category(), None);
    let (_, request) = state.tick(t0 + ms(6500)).unwrap();
    assert_eq!(request, CatalogRequest::for_filter(&Filter::Search("t".into()), 1));
}

#[test]
fn test_reselecting_category_deselects() {
    let mut state = state();
    state.select_category(Category::Genre(35));
    assert_eq!(state.active_category(), Some(Category::Genre(35)));
    let (_, request) = state.select_category(Category::Genre(35));
    assert_eq!(state.active_category(), None);
    assert_eq!(request, CatalogRequest::for_filter(&Filter::None, 1));
}

#[test]
fn test_typing_then_erasing_in_category_falls_back_to_popular() {
    let mut state = state();
    let t0 = Instant::now();
    state.select_category(Category::Genre(27));

    state.set_search_input("x".into(), t0);
    state.set_search_input(String::new(), t0 + ms(100));
    assert!(state.tick(t0 + ms(300)).is_none());
    let (_, request) = state.tick(t0 + ms(700)).unwrap();
    assert_eq!(request, CatalogRequest::for_filter(&Filter::None, 1));
    assert!(state.tick(t0 + ms(900)).is_none());
}

#[test]
fn test_page_two_duplicate_favorite_kept_once() {
    let mut state = state();
    let (ticket, _) = state.refresh();
    state.apply(ticket, Ok(movies(30..50)));

    let fav = state.results().iter().find(|m| m.id == 42).cloned().unwrap();
    state.toggle_favorite(&fav);

    let (ticket, request) = state.load_more().unwrap();
    assert_eq!(request.page(), 2);
    assert!(!state.is_loading());
    state.apply(ticket, Ok(vec![movie(42), movie(60)]));

    assert_eq!(state.results().iter().filter(|m| m.id == 42).count(), 1);
    assert_eq!(state.results().len(), 21);
    assert!(state.is_favorite(42));
    assert_eq!(state.favorites().len(), 1);
}

#[test]
fn test_favorites_survive_restart() {
    let storage = MemoryStorage::default();
    let mut first = AppState::init(AppConfig::default(), Box::new(storage.clone()));
    first.toggle_favorite(&movie(1));
    first.toggle_favorite(&movie(2));
    first.shutdown();

    let second = AppState::init(AppConfig::default(), Box::new(storage));
    let ids: Vec<i64> = second.favorites().items().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_set_config_changes_debounce_period() {
    let mut state = state();
    let t0 = Instant::now();
    state.set_config(AppConfig { debounce_ms: 200, ..AppConfig::default() });
    assert_eq!(state.config.debounce_ms, 200);

    state.set_search_input("heat".into(), t0);
    assert!(state.tick(t0 + ms(199)).is_none());
    let (_, request) = state.tick(t0 + ms(200)).unwrap();
    assert_eq!(request, CatalogRequest::for_filter(&Filter::Search("heat".into()), 1));
}
