use chrono::{DateTime, NaiveDate, TimeZone};
use scores_api::{Competitor, Event, StatusCategory};
use std::fmt::Display;

pub const NO_GAMES_LABEL: &str = "No Games Today";

/// One side of the scoreboard as it should be painted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSlot {
    pub name: String,
    pub score: String,
    pub emphasized: bool,
    pub disabled: bool,
    pub logo_url: Option<String>,
}

/// Everything the renderer needs for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySnapshot {
    pub event_id: Option<String>,
    pub event_name: String,
    pub scheduled_label: String,
    pub teams: [TeamSlot; 2],
    pub status_line: String,
    pub period: Option<u32>,
    pub period_label: String,
    pub category: Option<StatusCategory>,
}

impl DisplaySnapshot {
    pub fn placeholder() -> Self {
        Self {
            scheduled_label: NO_GAMES_LABEL.to_string(),
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.event_id.is_none()
    }
}

/// Map the current event (or none) to what the screen shows at `now`.
/// Calendar comparisons happen in `now`'s timezone.
pub fn project<Tz>(event: Option<&Event>, now: &DateTime<Tz>) -> DisplaySnapshot
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(event) = event else {
        return DisplaySnapshot::placeholder();
    };

    let status = &event.status;
    let started = status.started();
    let completed = status.completed();

    let status_line = match status.category {
        StatusCategory::NotStarted => String::new(),
        StatusCategory::InProgress => status.display_clock.clone(),
        StatusCategory::Completed => status.description.clone(),
    };
    let period = status.is_live().then_some(status.period);

    DisplaySnapshot {
        event_id: Some(event.id.clone()),
        event_name: event.name.clone(),
        scheduled_label: scheduled_label(&event.scheduled.with_timezone(&now.timezone()), now),
        teams: event
            .competitors
            .clone()
            .map(|c| team_slot(&c, started, completed)),
        status_line,
        period,
        period_label: period
            .map(|p| event.league_kind.period_label(p))
            .unwrap_or_default(),
        category: Some(status.category),
    }
}

/// `"Tomorrow 6:00 PM"`, `"7:30 PM"`, `"May 3 1:05 PM"`.
pub fn scheduled_label<Tz>(scheduled: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = scheduled.format("%-I:%M %p").to_string();
    match relative_day_label(scheduled.date_naive(), now.date_naive()) {
        day if day.is_empty() => time,
        day => format!("{day} {time}"),
    }
}

pub fn relative_day_label(event_day: NaiveDate, today: NaiveDate) -> String {
    if event_day == today {
        String::new()
    } else if today.pred_opt() == Some(event_day) {
        "Yesterday".to_string()
    } else if today.succ_opt() == Some(event_day) {
        "Tomorrow".to_string()
    } else {
        event_day.format("%b %-d").to_string()
    }
}

pub fn display_name(competitor: &Competitor) -> String {
    if competitor.is_home {
        format!("{} (Home)", competitor.name)
    } else {
        competitor.name.clone()
    }
}

fn team_slot(competitor: &Competitor, started: bool, completed: bool) -> TeamSlot {
    TeamSlot {
        name: display_name(competitor),
        score: if started { competitor.score.clone() } else { String::new() },
        emphasized: completed && competitor.winner,
        disabled: completed && !competitor.winner,
        logo_url: (!competitor.logo_url.is_empty()).then(|| competitor.logo_url.clone()),
    }
}
