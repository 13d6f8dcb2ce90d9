use crate::state::rotation::RotationScheduler;
use chrono::{DateTime, Local};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Logo lookups by URL. `None` marks a download that failed this round.
#[derive(Debug, Default)]
pub struct LogoState {
    pub cached: HashMap<String, Option<PathBuf>>,
    pub pending: HashSet<String>,
}

impl LogoState {
    pub fn path(&self, url: &str) -> Option<&PathBuf> {
        self.cached.get(url).and_then(Option::as_ref)
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.cached.contains_key(url) || self.pending.contains(url)
    }

    /// Give failed downloads another chance after a data refresh.
    pub fn forget_failures(&mut self) {
        self.cached.retain(|_, path| path.is_some());
    }
}

#[derive(Debug)]
pub struct AppState {
    pub rotation: RotationScheduler,
    pub logos: LogoState,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(cycle_period: Duration) -> Self {
        Self {
            rotation: RotationScheduler::new(cycle_period, Instant::now()),
            logos: LogoState::default(),
            show_logs: false,
            last_error: None,
            last_refresh: None,
        }
    }
}
