mod app;
mod components;
mod draw;
mod keys;
mod state;
mod summary;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, CONFIG_ENV, logo_cache_root};
use crate::state::logo_cache::LogoCache;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, warn};
use scores_api::client::ScoresApi;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// How often the rotation timer is checked and the progress gauge redrawn.
const CYCLE_TICK: Duration = Duration::from_millis(100);

enum CliAction {
    Run { config: Option<PathBuf> },
    Summary,
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match handle_cli_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Summary => return summary::print_summary(&ScoresApi::new()).await,
        CliAction::Run { config } => config,
    };

    let settings = AppSettings::load(config)?;

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let refresh_period = settings.refresh_data_period;
    let filter = settings.filter.clone();
    let app = Arc::new(Mutex::new(App::new(settings)));
    let logo_cache = LogoCache::new(logo_cache_root());

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker =
        NetworkWorker::new(ScoresApi::new(), filter, network_req_rx, network_resp_tx.clone());
    let network_task = tokio::spawn(network_worker.run());

    // Periodic event refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), refresh_period);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Rotation tick thread
    let tick_tx = ui_event_tx.clone();
    let cycle_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(CYCLE_TICK);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Trigger the first load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_tx,
        network_resp_rx,
        logo_cache,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();
    cycle_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliAction {
    let mut config = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return CliAction::Exit;
            }
            "-V" | "--version" => {
                println!("sports-status {}", env!("CARGO_PKG_VERSION"));
                return CliAction::Exit;
            }
            "-s" | "--summary" => return CliAction::Summary,
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a path\n\n{}", usage_text());
                    std::process::exit(2);
                }
            },
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    CliAction::Run { config }
}

fn usage_text() -> String {
    format!(
        "sports-status - rotating live scores for the teams you follow

Usage:
  sports-status [--config PATH]
  sports-status --summary
  sports-status --help
  sports-status --version

Keys:
  ←/h  →/l   previous / next event
  r          refresh now
  f          toggle full screen
  \"          toggle log pane
  q          quit

Environment:
  {CONFIG_ENV}   Path to config.json (default $XDG_CONFIG_HOME/sports-status/config.json)"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    network_responder: mpsc::Sender<NetworkResponse>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    logo_cache: LogoCache,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let event_changed = handle_ui_event(ui_event, &app, &network_requests).await;
                let mut app_guard = app.lock().await;
                if event_changed {
                    spawn_logo_fetches(&mut app_guard, &logo_cache, &network_responder);
                }
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    spawn_logo_fetches(&mut app_guard, &logo_cache, &network_responder);
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

/// Returns true when the event on screen may have changed.
async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::RefreshEvents).await;
            false
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await
        }
        UiEvent::Resize => false,
        UiEvent::Tick => app.lock().await.on_tick(Instant::now()),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::EventsLoaded { events } => {
            app.lock().await.on_events_loaded(events);
        }
        NetworkResponse::LogoCached { url, path } => {
            app.lock().await.on_logo_cached(url, path);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

/// One task per missing logo of the event on screen; results come back as
/// `NetworkResponse::LogoCached`.
fn spawn_logo_fetches(app: &mut App, cache: &LogoCache, responses: &mpsc::Sender<NetworkResponse>) {
    for url in app.logos_to_fetch() {
        let cache = cache.clone();
        let responses = responses.clone();
        tokio::spawn(async move {
            let path = match cache.fetch(&url).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            };
            let _ = responses.send(NetworkResponse::LogoCached { url, path }).await;
        });
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
