use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::display::{DisplaySnapshot, project};
use chrono::Local;
use log::{info, warn};
use scores_api::Event;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(settings.event_cycle_period),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        info!("settings loaded from {}", app.settings.source.display());

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_events_loaded(&mut self, events: Vec<Event>) {
        self.state.last_error = None;
        self.state.last_refresh = Some(Local::now());
        self.state.logos.forget_failures();
        self.state.rotation.replace_events(events);
    }

    pub fn on_logo_cached(&mut self, url: String, path: Option<PathBuf>) {
        if path.is_none() {
            warn!("no logo available for {url}");
        }
        self.state.logos.pending.remove(&url);
        self.state.logos.cached.insert(url, path);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Rotation
    // -----------------------------------------------------------------------

    /// Cycle timer hook. Returns true when a different event is now showing.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.state.rotation.tick(now)
    }

    pub fn show_next_event(&mut self) {
        self.state.rotation.navigate(1, Instant::now());
    }

    pub fn show_previous_event(&mut self) {
        self.state.rotation.navigate(-1, Instant::now());
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        project(self.state.rotation.current(), &Local::now())
    }

    pub fn rotation_progress(&self, now: Instant) -> f64 {
        self.state.rotation.progress(now)
    }

    /// `"3/7"`, or empty when nothing is loaded.
    pub fn position_label(&self) -> String {
        let rotation = &self.state.rotation;
        if rotation.is_empty() {
            String::new()
        } else {
            format!("{}/{}", rotation.current_index() + 1, rotation.len())
        }
    }

    // -----------------------------------------------------------------------
    // Logos
    // -----------------------------------------------------------------------

    /// Logo URLs of the event on screen that are neither cached nor in flight.
    /// Marks the returned URLs as pending.
    pub fn logos_to_fetch(&mut self) -> Vec<String> {
        let Some(event) = self.state.rotation.current() else {
            return Vec::new();
        };
        let urls: Vec<String> = event
            .competitors
            .iter()
            .map(|c| c.logo_url.clone())
            .filter(|url| !url.is_empty() && !self.state.logos.is_known(url))
            .collect();
        for url in &urls {
            self.state.logos.pending.insert(url.clone());
        }
        if !urls.is_empty() {
            info!("fetching {} team logos", urls.len());
        }
        urls
    }

    pub fn logo_path(&self, url: &str) -> Option<&Path> {
        self.state.logos.path(url).map(PathBuf::as_path)
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
