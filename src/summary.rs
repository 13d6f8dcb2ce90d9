use crate::state::display::display_name;
use anyhow::Context;
use chrono::{Local, TimeZone};
use scores_api::client::ScoresApi;
use scores_api::{Event, Scoreboard, StatusCategory};
use std::fmt::{Display, Write};

/// `--summary`: fetch everything ESPN headlines right now and print it as a tree.
pub async fn print_summary(api: &ScoresApi) -> anyhow::Result<()> {
    let board = api
        .fetch_scoreboard()
        .await
        .context("could not fetch the scoreboard")?;
    print!("{}", render_summary(&board, &Local));
    Ok(())
}

pub fn render_summary<Tz>(board: &Scoreboard, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::from("Current Summary:\n");
    for sport in &board.sports {
        let _ = writeln!(out, "\t{}", sport.name);
        for league in &sport.leagues {
            let _ = writeln!(out, "\t\t{}", league.name);
            for event in &league.events {
                let [first, second] = &event.competitors;
                let _ = writeln!(
                    out,
                    "\t\t\t{}: {} vs {} - {}",
                    event.scheduled.with_timezone(tz).format("%-I:%M %p %Z"),
                    display_name(first),
                    display_name(second),
                    score_summary(event),
                );
            }
        }
    }
    out
}

pub fn score_summary(event: &Event) -> String {
    let [first, second] = &event.competitors;
    match event.status.category {
        StatusCategory::NotStarted => "Not Started".to_string(),
        StatusCategory::InProgress => {
            format!("{} to {} ({})", first.score, second.score, event.status.display_clock)
        }
        StatusCategory::Completed => {
            format!("{} to {} ({})", first.score, second.score, event.status.description)
        }
    }
}
