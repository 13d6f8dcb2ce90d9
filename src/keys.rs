use crate::app::App;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Returns true when the displayed event may have changed.
pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    let mut guard = app.lock().await;

    match (key_event.code, key_event.modifiers) {
        // Quit
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Manual rotation
        (Char('l') | KeyCode::Right, _) => {
            guard.show_next_event();
            return true;
        }
        (Char('h') | KeyCode::Left, _) => {
            guard.show_previous_event();
            return true;
        }

        (Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::RefreshEvents).await;
        }
        (Char('f'), _) => guard.toggle_full_screen(),
        (Char('"'), _) => guard.toggle_show_logs(),
        _ => {}
    }
    false
}
