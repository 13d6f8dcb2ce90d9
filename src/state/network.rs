use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use scores_api::Event;
use scores_api::client::{ApiResult, ScoresApi};
use scores_api::filter::{FilterSpec, filter_events, sport_league_pairs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: ScoresApi,
    filter: Arc<FilterSpec>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: ScoresApi,
        filter: Arc<FilterSpec>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            filter,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::RefreshEvents => self.handle_refresh_events().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_refresh_events(&self) -> ApiResult<NetworkResponse> {
        debug!("refreshing events");
        let events = load_filtered_events(&self.client, &self.filter).await?;
        info!("loaded {} events", events.len());
        Ok(NetworkResponse::EventsLoaded { events })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

/// Fetch every configured league, then keep only what the filter admits.
/// The returned events are owned copies; their league handles point into a
/// board that is dropped here, so only ids and display fields stay meaningful.
pub async fn load_filtered_events(client: &ScoresApi, filter: &FilterSpec) -> ApiResult<Vec<Event>> {
    let pairs = sport_league_pairs(filter);
    if pairs.is_empty() {
        debug!("filter names no sport/league pairs, nothing to fetch");
        return Ok(Vec::new());
    }

    let board = client.fetch_leagues(&pairs).await?;
    let candidates = board.flatten();
    Ok(filter_events(&board, &candidates, filter)
        .into_iter()
        .cloned()
        .collect())
}
