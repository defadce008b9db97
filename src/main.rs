//! Cinegrid - movie discovery for the desktop
//! Browse, search and bookmark movies from The Movie Database (TMDB)

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

mod api;
mod config;
mod debounce;
mod detail;
mod error;
mod favorites;
mod logging;
mod models;
mod pager;
mod query;
mod state;

use api::{youtube_url, ImageSize, TmdbClient};
use config::{app_dir, AppConfig};
use detail::{DetailState, MovieDetail, PersonDetail};
use error::ApiError;
use favorites::{JsonFileStorage, Toggled};
use models::*;
use pager::{Applied, FetchTicket};
use state::{AppState, FetchPlan};

const CARD_WIDTH: f32 = 180.0;
const POSTER_HEIGHT: f32 = 270.0;

/// Background task messages
enum TaskResult {
    PageLoaded {
        ticket: FetchTicket,
        result: Result<Vec<Movie>, ApiError>,
    },
    MovieLoaded {
        id: i64,
        result: Result<MovieDetail, ApiError>,
    },
    PersonLoaded {
        id: i64,
        result: Result<PersonDetail, ApiError>,
    },
}

/// What to do after drawing a movie card
enum CardAction {
    None,
    Open(i64),
    ToggleFavorite,
}

/// Everything a worker thread needs to run a fetch and report back
struct FetchContext {
    client: TmdbClient,
    sender: Sender<TaskResult>,
    repaint: egui::Context,
}

impl FetchContext {
    fn send(&self, result: TaskResult) {
        let _ = self.sender.send(result);
        self.repaint.request_repaint();
    }
}

fn main() -> Result<(), eframe::Error> {
    let config = AppConfig::load();
    let data_dir = app_dir();
    let (console_receiver, log_guard) = logging::init(&data_dir, &config.log_filter);
    info!("Cinegrid starting, data directory {}", data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1250.0, 800.0])
            .with_min_inner_size([820.0, 550.0]),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "Cinegrid",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let storage = JsonFileStorage::new(data_dir);
            Ok(Box::new(CineApp::new(&cc.egui_ctx, config, storage, console_receiver, log_guard)))
        }),
    )
}

struct CineApp {
    state: AppState,
    client: TmdbClient,

    // Navigation
    view: View,
    history: Vec<View>,
    movie_detail: DetailState<MovieDetail>,
    person_detail: DetailState<PersonDetail>,

    // Background task channel
    task_receiver: Receiver<TaskResult>,
    task_sender: Sender<TaskResult>,
    repaint: egui::Context,

    // Load-more sentinel was on screen last frame
    sentinel_visible: bool,

    status_message: String,

    // Settings dialog
    show_settings: bool,
    settings_draft: AppConfig,
    show_clear_confirm: bool,

    // Console log
    show_console: bool,
    console_log: Vec<String>,
    console_receiver: Receiver<String>,
    _log_guard: Option<WorkerGuard>,
}

impl CineApp {
    fn new(
        ctx: &egui::Context,
        config: AppConfig,
        storage: JsonFileStorage,
        console_receiver: Receiver<String>,
        log_guard: Option<WorkerGuard>,
    ) -> Self {
        ctx.set_visuals(if config.dark_mode { egui::Visuals::dark() } else { egui::Visuals::light() });

        let client = TmdbClient::from_config(&config);
        let (task_sender, task_receiver) = channel();
        let status_message = if config.has_api_key() {
            "Ready".to_string()
        } else {
            "No TMDB API key - open Settings to add one".to_string()
        };
        let settings_draft = config.clone();
        let state = AppState::init(config, Box::new(storage));

        let mut app = Self {
            state,
            client,
            view: View::Home,
            history: Vec::new(),
            movie_detail: DetailState::Idle,
            person_detail: DetailState::Idle,
            task_receiver,
            task_sender,
            repaint: ctx.clone(),
            sentinel_visible: false,
            status_message,
            show_settings: false,
            settings_draft,
            show_clear_confirm: false,
            show_console: false,
            console_log: Vec::new(),
            console_receiver,
            _log_guard: log_guard,
        };
        let plan = app.state.refresh();
        app.dispatch(plan);
        app
    }

    fn fetch_context(&self) -> FetchContext {
        FetchContext {
            client: self.client.clone(),
            sender: self.task_sender.clone(),
            repaint: self.repaint.clone(),
        }
    }

    /// Run a list fetch on a worker thread
    fn dispatch(&mut self, (ticket, request): FetchPlan) {
        if ticket.is_load_more() {
            self.status_message = format!("Loading page {}...", ticket.page);
        } else {
            self.status_message = format!("Loading {}...", self.state.filter().describe());
        }

        let ctx = self.fetch_context();
        thread::spawn(move || {
            let result = ctx.client.fetch_catalog(&request);
            ctx.send(TaskResult::PageLoaded { ticket, result });
        });
    }

    fn drain_console(&mut self) {
        while let Ok(line) = self.console_receiver.try_recv() {
            self.console_log.push(line);
        }
        if self.console_log.len() > logging::CONSOLE_CAPACITY {
            let excess = self.console_log.len() - logging::CONSOLE_CAPACITY;
            self.console_log.drain(..excess);
        }
    }

    fn drain_tasks(&mut self) {
        while let Ok(result) = self.task_receiver.try_recv() {
            match result {
                TaskResult::PageLoaded { ticket, result } => {
                    match self.state.apply(ticket, result) {
                        Applied::Replaced(n) => self.status_message = format!("Loaded {} movies", n),
                        Applied::Appended(n) => {
                            self.status_message = format!("Page {}: {} new movies", ticket.page, n)
                        }
                        Applied::Cleared if !self.state.config.has_api_key() => {
                            self.status_message = "No TMDB API key - open Settings to add one".to_string()
                        }
                        Applied::Cleared => self.status_message = "No results".to_string(),
                        Applied::Ignored => self.status_message = "Ready".to_string(),
                        Applied::Stale => {}
                    }
                }
                TaskResult::MovieLoaded { id, result } => {
                    if !self.movie_detail.finish(id, result) {
                        debug!(movie = id, "discarding detail for a page no longer open");
                    }
                }
                TaskResult::PersonLoaded { id, result } => {
                    if !self.person_detail.finish(id, result) {
                        debug!(person = id, "discarding detail for a page no longer open");
                    }
                }
            }
        }
    }

    fn navigate(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.history.push(self.view);
        self.show_view(view);
    }

    fn go_back(&mut self) {
        let previous = self.history.pop().unwrap_or(View::Home);
        self.show_view(previous);
    }

    fn show_view(&mut self, view: View) {
        self.view = view;
        self.sentinel_visible = false;
        match view {
            View::Movie(id) => self.load_movie(id),
            View::Person(id) => self.load_person(id),
            View::Home | View::Favorites => {}
        }
    }

    fn load_movie(&mut self, id: i64) {
        self.movie_detail = DetailState::Loading(id);
        let ctx = self.fetch_context();
        thread::spawn(move || {
            let result = detail::load_movie(&ctx.client, id);
            ctx.send(TaskResult::MovieLoaded { id, result });
        });
    }

    fn load_person(&mut self, id: i64) {
        self.person_detail = DetailState::Loading(id);
        let ctx = self.fetch_context();
        thread::spawn(move || {
            let result = detail::load_person(&ctx.client, id);
            ctx.send(TaskResult::PersonLoaded { id, result });
        });
    }

    fn toggle_favorite(&mut self, movie: &Movie) {
        self.status_message = match self.state.toggle_favorite(movie) {
            Toggled::Added => format!("Added '{}' to favorites", movie.title),
            Toggled::Removed => format!("Removed '{}' from favorites", movie.title),
        };
    }

    fn heart(is_fav: bool) -> egui::RichText {
        if is_fav {
            egui::RichText::new("♥").size(18.0).color(egui::Color32::from_rgb(230, 60, 80))
        } else {
            egui::RichText::new("♡").size(18.0).color(egui::Color32::GRAY)
        }
    }

    /// Poster card. The heart button takes precedence over opening the movie.
    fn movie_card(ui: &mut egui::Ui, client: &TmdbClient, movie: &Movie, is_fav: bool) -> CardAction {
        let mut heart_clicked = false;
        let mut opened = false;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.vertical(|ui| {
                if let Some(poster) = &movie.poster_path {
                    let image = egui::Image::new(client.image_url(poster, ImageSize::Poster))
                        .fit_to_exact_size(egui::vec2(CARD_WIDTH, POSTER_HEIGHT))
                        .sense(egui::Sense::click());
                    opened |= ui.add(image).on_hover_cursor(egui::CursorIcon::PointingHand).clicked();
                }

                ui.horizontal(|ui| {
                    let hover = if is_fav { "Remove from favorites" } else { "Add to favorites" };
                    heart_clicked = ui.button(Self::heart(is_fav)).on_hover_text(hover).clicked();
                    ui.label(egui::RichText::new(movie.rating_label()).color(egui::Color32::GOLD));
                });

                let title = egui::Label::new(egui::RichText::new(&movie.title).strong())
                    .truncate()
                    .sense(egui::Sense::click());
                opened |= ui.add(title).on_hover_cursor(egui::CursorIcon::PointingHand).clicked();

                ui.label(
                    egui::RichText::new(movie.year().map(|y| y.to_string()).unwrap_or_default())
                        .small()
                        .color(egui::Color32::GRAY),
                );
            });
        });

        if heart_clicked {
            CardAction::ToggleFavorite
        } else if opened {
            CardAction::Open(movie.id)
        } else {
            CardAction::None
        }
    }

    /// Wrapped grid of cards; returns the movie to toggle and the id to open
    fn card_grid<'a>(
        ui: &mut egui::Ui,
        client: &TmdbClient,
        state: &AppState,
        movies: impl Iterator<Item = &'a Movie>,
    ) -> (Option<Movie>, Option<i64>) {
        let mut toggle_fav: Option<Movie> = None;
        let mut to_open: Option<i64> = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);
            for movie in movies {
                match Self::movie_card(ui, client, movie, state.is_favorite(movie.id)) {
                    CardAction::ToggleFavorite => toggle_fav = Some(movie.clone()),
                    CardAction::Open(id) => to_open = Some(id),
                    CardAction::None => {}
                }
            }
        });

        (toggle_fav, to_open)
    }

    fn show_home(&mut self, ui: &mut egui::Ui) {
        if !self.state.config.has_api_key() {
            ui.colored_label(
                egui::Color32::from_rgb(240, 180, 60),
                "⚠ No TMDB API key configured. Open Settings or set TMDB_API_KEY.",
            );
            ui.add_space(6.0);
        }

        // Search box
        let mut search = self.state.search_input().to_string();
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut search)
                    .hint_text("🔍 Search for a movie...")
                    .desired_width(420.0),
            );
            if response.changed() {
                self.state.set_search_input(search.clone(), Instant::now());
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                if let Some(plan) = self.state.submit_search() {
                    self.dispatch(plan);
                }
            }
        });

        // Category buttons
        let mut clicked_category: Option<Category> = None;
        ui.horizontal_wrapped(|ui| {
            for (category, label) in CATEGORIES {
                let selected = self.state.active_category() == Some(*category);
                if ui.selectable_label(selected, *label).clicked() {
                    clicked_category = Some(*category);
                }
            }
        });
        if let Some(category) = clicked_category {
            let plan = self.state.select_category(category);
            self.dispatch(plan);
        }

        ui.separator();

        let mut toggle_fav: Option<Movie> = None;
        let mut to_open: Option<i64> = None;
        let mut load_more = false;
        let mut sentinel_visible = false;

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let state = &self.state;
            let with_posters = state.results().iter().filter(|m| m.poster_path.is_some());
            let (fav, open) = Self::card_grid(ui, &self.client, state, with_posters);
            toggle_fav = fav;
            to_open = open;

            if state.is_loading() {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label("Loading movies...");
                });
            } else if state.results().is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| ui.heading("No movies found"));
            } else {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    let response = ui.button("Load more");
                    sentinel_visible = ui.is_rect_visible(response.rect);
                    load_more = response.clicked();
                });
            }
        });

        // Scrolling the sentinel into view counts as one request
        if sentinel_visible && !self.sentinel_visible {
            load_more = true;
        }
        self.sentinel_visible = sentinel_visible;

        if load_more {
            if let Some(plan) = self.state.load_more() {
                self.dispatch(plan);
            }
        }
        if let Some(movie) = toggle_fav {
            self.toggle_favorite(&movie);
        }
        if let Some(id) = to_open {
            self.navigate(View::Movie(id));
        }
    }

    fn show_favorites(&mut self, ui: &mut egui::Ui) {
        let count = self.state.favorites().len();

        ui.vertical_centered(|ui| {
            ui.heading("♥ My Collection");
            let label = if count == 1 { "movie saved" } else { "movies saved" };
            ui.label(egui::RichText::new(format!("{} {}", count, label)).color(egui::Color32::GRAY));
        });

        if count == 0 {
            let mut explore = false;
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("🎬 Nothing here yet");
                ui.label("Click ♡ on any movie to add it to your collection");
                ui.add_space(12.0);
                explore = ui.button("Explore movies").clicked();
            });
            if explore {
                self.navigate(View::Home);
            }
            return;
        }

        ui.horizontal(|ui| {
            if ui.button("💾 Export...").clicked() {
                self.export_favorites();
            }
            if ui.button("🗑 Clear all").clicked() {
                self.show_clear_confirm = true;
            }
        });
        ui.separator();

        let mut toggle_fav: Option<Movie> = None;
        let mut to_open: Option<i64> = None;
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let state = &self.state;
            let (fav, open) = Self::card_grid(ui, &self.client, state, state.favorites().items().iter());
            toggle_fav = fav;
            to_open = open;
        });

        if let Some(movie) = toggle_fav {
            self.toggle_favorite(&movie);
        }
        if let Some(id) = to_open {
            self.navigate(View::Movie(id));
        }
    }

    fn export_favorites(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("favorites.json")
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        self.status_message = match self.state.favorites().export_to(&path) {
            Ok(()) => format!("Exported favorites to {}", path.display()),
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                "Export failed".to_string()
            }
        };
    }

    fn show_movie(&mut self, ui: &mut egui::Ui, id: i64) {
        let detail = match &self.movie_detail {
            DetailState::Loaded(current, detail) if *current == id => detail.clone(),
            DetailState::Failed(current) if *current == id => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.heading("Could not load this movie");
                });
                return;
            }
            _ => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                });
                return;
            }
        };

        let movie = &detail.movie;
        let is_fav = self.state.is_favorite(movie.id);
        let mut toggle = false;
        let mut to_open: Option<View> = None;

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            if let Some(backdrop) = &movie.backdrop_path {
                let width = ui.available_width();
                ui.add(
                    egui::Image::new(self.client.image_url(backdrop, ImageSize::Original))
                        .fit_to_exact_size(egui::vec2(width, width * 9.0 / 21.0)),
                );
            }

            ui.horizontal(|ui| {
                ui.heading(&movie.title);
                toggle = ui.button(Self::heart(is_fav)).clicked();
            });

            ui.horizontal(|ui| {
                if let Some(year) = movie.year() {
                    ui.label(year.to_string());
                }
                if let Some(runtime) = movie.runtime {
                    ui.label(format!("⏱ {}", format_runtime(runtime)));
                }
                ui.label(egui::RichText::new(movie.rating_label()).color(egui::Color32::GOLD));
            });

            if let Some(key) = &detail.trailer_key {
                if ui.button("▶ Watch trailer").clicked() {
                    ui.ctx().open_url(egui::OpenUrl::new_tab(youtube_url(key)));
                }
            }

            ui.add_space(8.0);
            if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
                ui.label(overview);
            }

            if !detail.cast.is_empty() {
                ui.add_space(12.0);
                ui.strong("Cast");
                ui.horizontal_wrapped(|ui| {
                    for actor in &detail.cast {
                        ui.vertical(|ui| {
                            ui.set_width(100.0);
                            if let Some(profile) = &actor.profile_path {
                                ui.add(
                                    egui::Image::new(self.client.image_url(profile, ImageSize::Profile))
                                        .fit_to_exact_size(egui::vec2(92.0, 138.0)),
                                );
                            } else {
                                ui.label("👤");
                            }
                            if ui.link(&actor.name).clicked() {
                                to_open = Some(View::Person(actor.id));
                            }
                            if let Some(character) = &actor.character {
                                ui.label(egui::RichText::new(character).small().color(egui::Color32::GRAY));
                            }
                        });
                    }
                });
            }

            let similar: Vec<&Movie> = detail.similar.iter().filter(|m| m.poster_path.is_some()).collect();
            if !similar.is_empty() {
                ui.add_space(12.0);
                ui.strong("Similar movies");
                egui::ScrollArea::horizontal().id_salt("similar").show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for sim in similar {
                            if let Some(poster) = &sim.poster_path {
                                let image = egui::Image::new(self.client.image_url(poster, ImageSize::Thumb))
                                    .fit_to_exact_size(egui::vec2(120.0, 180.0))
                                    .sense(egui::Sense::click());
                                if ui.add(image).on_hover_text(&sim.title).clicked() {
                                    to_open = Some(View::Movie(sim.id));
                                }
                            }
                        }
                    });
                });
            }
        });

        if toggle {
            self.toggle_favorite(movie);
        }
        if let Some(view) = to_open {
            self.navigate(view);
        }
    }

    fn show_person(&mut self, ui: &mut egui::Ui, id: i64) {
        let detail = match &self.person_detail {
            DetailState::Loaded(current, detail) if *current == id => detail.clone(),
            DetailState::Failed(current) if *current == id => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.heading("Could not load this person");
                });
                return;
            }
            _ => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                });
                return;
            }
        };

        let person = &detail.person;
        let mut toggle_fav: Option<Movie> = None;
        let mut to_open: Option<i64> = None;

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.horizontal(|ui| {
                if let Some(profile) = &person.profile_path {
                    ui.add(
                        egui::Image::new(self.client.image_url(profile, ImageSize::Profile))
                            .fit_to_exact_size(egui::vec2(185.0, 278.0)),
                    );
                }
                ui.vertical(|ui| {
                    ui.heading(&person.name);
                    if let Some(birthday) = person.birthday.as_deref().filter(|b| !b.is_empty()) {
                        ui.label(format!("Born {}", birthday));
                    }
                    if let Some(place) = person.place_of_birth.as_deref().filter(|p| !p.is_empty()) {
                        ui.label(place);
                    }
                    ui.add_space(8.0);
                    match person.biography.as_deref().filter(|b| !b.is_empty()) {
                        Some(bio) => ui.label(bio),
                        None => ui.label(egui::RichText::new("No biography available").italics()),
                    };
                });
            });

            ui.add_space(12.0);
            ui.strong(format!("Filmography ({})", detail.credits.len()));
            let movies = detail.credits.iter().map(|c| &c.movie).filter(|m| m.poster_path.is_some());
            let (fav, open) = Self::card_grid(ui, &self.client, &self.state, movies);
            toggle_fav = fav;
            to_open = open;
        });

        if let Some(movie) = toggle_fav {
            self.toggle_favorite(&movie);
        }
        if let Some(id) = to_open {
            self.navigate(View::Movie(id));
        }
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut save = false;

        egui::Window::new("⚙ Settings")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
                    ui.label("TMDB API key");
                    ui.add(egui::TextEdit::singleline(&mut self.settings_draft.api_key).password(true));
                    ui.end_row();

                    ui.label("Language");
                    ui.text_edit_singleline(&mut self.settings_draft.language);
                    ui.end_row();

                    ui.label("Trailer language");
                    ui.text_edit_singleline(&mut self.settings_draft.video_language);
                    ui.end_row();

                    ui.label("Dark mode");
                    ui.checkbox(&mut self.settings_draft.dark_mode, "");
                    ui.end_row();
                });
                ui.add_space(8.0);
                save = ui.button("Save").clicked();
            });

        self.show_settings = open && !save;
        if save {
            self.apply_settings(ctx);
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        let config = self.settings_draft.clone();
        config.save();
        ctx.set_visuals(if config.dark_mode { egui::Visuals::dark() } else { egui::Visuals::light() });
        self.client = TmdbClient::from_config(&config);
        self.state.set_config(config);
        info!("Settings saved");
        self.status_message = "Settings saved".to_string();

        let plan = self.state.refresh();
        self.dispatch(plan);
    }

    fn show_clear_confirm_window(&mut self, ctx: &egui::Context) {
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Clear favorites?")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Remove all {} favorites?", self.state.favorites().len()));
                ui.horizontal(|ui| {
                    confirmed = ui.button("Clear").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });
        if confirmed {
            self.state.clear_favorites();
            self.status_message = "All favorites cleared".to_string();
        }
        if confirmed || cancelled {
            self.show_clear_confirm = false;
        }
    }

    fn show_console_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_console;
        egui::Window::new("Console")
            .open(&mut open)
            .default_size([700.0, 300.0])
            .show(ctx, |ui| {
                if ui.button("Clear").clicked() {
                    self.console_log.clear();
                }
                egui::ScrollArea::vertical().stick_to_bottom(true).auto_shrink([false, false]).show(ui, |ui| {
                    for line in &self.console_log {
                        ui.monospace(line);
                    }
                });
            });
        self.show_console = open;
    }
}

impl eframe::App for CineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_console();
        self.drain_tasks();

        let now = Instant::now();
        if let Some(plan) = self.state.tick(now) {
            self.dispatch(plan);
        }
        if let Some(wait) = self.state.next_wakeup(now) {
            ctx.request_repaint_after(wait);
        }

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎬 Cinegrid");
                ui.separator();
                let back_enabled = !self.history.is_empty();
                if ui.add_enabled(back_enabled, egui::Button::new("← Back")).clicked() {
                    self.go_back();
                }
                if ui.selectable_label(self.view == View::Home, "Home").clicked() {
                    self.navigate(View::Home);
                }
                let fav_label = format!("♥ Favorites ({})", self.state.favorites().len());
                if ui.selectable_label(self.view == View::Favorites, fav_label).clicked() {
                    self.navigate(View::Favorites);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.settings_draft = self.state.config.clone();
                        self.show_settings = true;
                    }
                    if ui.selectable_label(self.show_console, "Console").clicked() {
                        self.show_console = !self.show_console;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.is_loading() {
                    ui.spinner();
                }
                ui.label(&self.status_message);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Home => self.show_home(ui),
            View::Favorites => self.show_favorites(ui),
            View::Movie(id) => self.show_movie(ui, id),
            View::Person(id) => self.show_person(ui, id),
        });

        if self.show_settings {
            self.show_settings_window(ctx);
        }
        if self.show_clear_confirm {
            self.show_clear_confirm_window(ctx);
        }
        if self.show_console {
            self.show_console_window(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
