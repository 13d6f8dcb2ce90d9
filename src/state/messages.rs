use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use scores_api::Event;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    RefreshEvents,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Filtered events in display order, replacing the previous list.
    EventsLoaded { events: Vec<Event> },
    /// `path` is `None` when the download failed.
    LogoCached { url: String, path: Option<PathBuf> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
