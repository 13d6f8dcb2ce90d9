use std::time::Instant;

use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::team_panel::TeamPanel;
use crate::state::display::DisplaySnapshot;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use scores_api::StatusCategory;

const TEAM_PANEL_HEIGHT: u16 = 7;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let snapshot = app.snapshot();

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }

        draw_event(f, layout.main, app, &snapshot);

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let mut title = vec![Span::styled(" Sports Status", Style::default().add_modifier(Modifier::BOLD))];
    let position = app.position_label();
    if !position.is_empty() {
        title.push(Span::raw(format!("  {position}")));
    }
    if let Some(at) = app.state.last_refresh {
        title.push(Span::styled(
            format!("  updated {}", at.format("%-I:%M %p")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let left = Paragraph::new(Line::from(title))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(left, header[0]);

    let (hint, hint_style) = match app.state.last_error.as_deref() {
        Some(err) => (format!("{err} "), Style::default().fg(Color::Red)),
        None => ("←/→ move  r refresh  q quit ".to_string(), style),
    };
    let right = Paragraph::new(hint)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(hint_style);
    f.render_widget(right, header[1]);
}

fn draw_event(f: &mut Frame, area: Rect, app: &App, snapshot: &DisplaySnapshot) {
    let title = if snapshot.event_name.is_empty() {
        String::new()
    } else {
        format!(" {} ", snapshot.event_name)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top, scheduled, _gap, teams, status, period, _bottom, gauge] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(TEAM_PANEL_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let label_style = if snapshot.is_placeholder() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    f.render_widget(
        Paragraph::new(snapshot.scheduled_label.as_str())
            .style(label_style)
            .alignment(Alignment::Center),
        scheduled,
    );

    if snapshot.is_placeholder() {
        return;
    }

    let [home, away] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(teams);
    for (slot, area) in snapshot.teams.iter().zip([home, away]) {
        let logo = slot.logo_url.as_deref().and_then(|url| app.logo_path(url));
        f.render_widget(TeamPanel { slot, logo }, area);
    }

    let status_style = match snapshot.category {
        Some(StatusCategory::InProgress) => Style::default().fg(Color::Green),
        Some(StatusCategory::Completed) => Style::default().fg(Color::Gray),
        _ => Style::default(),
    };
    f.render_widget(
        Paragraph::new(snapshot.status_line.as_str())
            .style(status_style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        status,
    );
    if snapshot.period.is_some() {
        f.render_widget(
            Paragraph::new(snapshot.period_label.as_str()).alignment(Alignment::Center),
            period,
        );
    }

    if app.state.rotation.len() > 1 {
        let ratio = app.rotation_progress(Instant::now());
        f.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::DarkGray))
                .ratio(ratio)
                .label(""),
            gauge,
        );
    }
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logger, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use scores_api::{Competitor, Event, Status};
    use std::path::Path;
    use tui::backend::TestBackend;

    fn app() -> App {
        let settings = AppSettings::from_json(
            r#"{"event_cycle_period_seconds": 10, "refresh_data_period_seconds": 60}"#,
            Path::new("config.json"),
        )
        .expect("settings should parse");
        App::new(settings)
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");
        draw(&mut terminal, app, LoadingState::default());
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_list_shows_no_games() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("No Games Today"), "{text}");
        assert!(text.contains("Sports Status"), "{text}");
    }

    #[test]
    fn live_event_shows_teams_status_and_position() {
        let mut app = app();
        let team = |name: &str, score: &str, is_home: bool| Competitor {
            name: name.to_string(),
            score: score.to_string(),
            is_home,
            ..Default::default()
        };
        let live = Event {
            id: "401".to_string(),
            name: "Chiefs at Bills".to_string(),
            status: Status {
                category: StatusCategory::InProgress,
                display_clock: "7:32".to_string(),
                period: 2,
                ..Default::default()
            },
            competitors: [team("Bills", "10", true), team("Chiefs", "14", false)],
            ..Default::default()
        };
        let other = Event { id: "402".to_string(), ..Default::default() };
        app.on_events_loaded(vec![live, other]);

        let text = screen(&mut app);
        assert!(text.contains("Bills (Home)"), "{text}");
        assert!(text.contains("14"), "{text}");
        assert!(text.contains("7:32"), "{text}");
        assert!(text.contains("Period: 2"), "{text}");
        assert!(text.contains("1/2"), "{text}");
    }

    #[test]
    fn refresh_error_is_shown_in_header() {
        let mut app = app();
        app.on_error("API error".to_string());
        let text = screen(&mut app);
        assert!(text.contains("API error"), "{text}");
    }
}
