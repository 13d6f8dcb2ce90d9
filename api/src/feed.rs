use crate::espn::{
    HeaderCompetitor, HeaderEvent, HeaderLeague, HeaderResponse, HeaderSport, bool_property,
    text_property,
};
use crate::{
    Competitor, Event, League, LeagueKind, LeagueRef, Scoreboard, Sport, SportRef, Status,
    StatusCategory,
};
use chrono::{DateTime, NaiveDateTime, Utc};

// ---------------------------------------------------------------------------
// Mapping: ESPN header wire types → clean domain types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed is missing required key `{key}` ({context})")]
    MissingKey { key: &'static str, context: String },
    #[error("event {event_id} has {count} competitors, expected 2")]
    CompetitorCount { event_id: String, count: usize },
    #[error("event {event_id} has unparseable date `{date}`")]
    InvalidDate { event_id: String, date: String },
}

impl FeedError {
    fn missing(key: &'static str, context: impl Into<String>) -> Self {
        FeedError::MissingKey { key, context: context.into() }
    }
}

impl Scoreboard {
    pub fn from_json(json: &str) -> Result<Scoreboard, FeedError> {
        let raw: HeaderResponse = serde_json::from_str(json)?;
        build(raw)
    }
}

/// Build the domain tree in Sport → League → Event → Competitor order.
pub fn build(raw: HeaderResponse) -> Result<Scoreboard, FeedError> {
    let sports = raw
        .sports
        .ok_or_else(|| FeedError::missing("sports", "feed root"))?
        .into_iter()
        .enumerate()
        .map(|(idx, sport)| build_sport(sport, SportRef(idx)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scoreboard { sports })
}

fn build_sport(raw: HeaderSport, handle: SportRef) -> Result<Sport, FeedError> {
    let name = text_property(&raw.properties, "name").unwrap_or_default();
    let leagues = raw
        .leagues
        .ok_or_else(|| FeedError::missing("leagues", format!("sport {name:?}")))?
        .into_iter()
        .enumerate()
        .map(|(idx, league)| {
            build_league(league, &name, LeagueRef { sport: handle.0, league: idx })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Sport { name, properties: raw.properties, leagues })
}

fn build_league(raw: HeaderLeague, sport_name: &str, handle: LeagueRef) -> Result<League, FeedError> {
    let name = text_property(&raw.properties, "name").unwrap_or_default();
    let short_name = text_property(&raw.properties, "shortName").unwrap_or_default();
    let abbreviation = text_property(&raw.properties, "abbreviation").unwrap_or_default();
    let kind = LeagueKind::detect(sport_name, &short_name);

    let events = raw
        .events
        .ok_or_else(|| FeedError::missing("events", format!("league {name:?}")))?
        .into_iter()
        .map(|event| build_event(event, handle, kind))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(League {
        name,
        short_name,
        abbreviation,
        kind,
        sport: handle.sport(),
        properties: raw.properties,
        events,
    })
}

fn build_event(raw: HeaderEvent, league: LeagueRef, league_kind: LeagueKind) -> Result<Event, FeedError> {
    let id = text_property(&raw.properties, "id")
        .ok_or_else(|| FeedError::missing("id", "event"))?;
    let context = || format!("event {id}");

    let date = text_property(&raw.properties, "date")
        .ok_or_else(|| FeedError::missing("date", context()))?;
    let scheduled = parse_feed_date(&date)
        .ok_or_else(|| FeedError::InvalidDate { event_id: id.clone(), date })?;

    let full_status = raw
        .full_status
        .ok_or_else(|| FeedError::missing("fullStatus", context()))?;
    let status_type = full_status
        .status_type
        .ok_or_else(|| FeedError::missing("fullStatus.type", context()))?;
    let completed = status_type
        .completed
        .ok_or_else(|| FeedError::missing("fullStatus.type.completed", context()))?;

    let status = Status {
        category: StatusCategory::classify(completed, status_type.state.as_deref().unwrap_or("")),
        display_clock: full_status.display_clock.unwrap_or_default(),
        description: status_type.description.unwrap_or_default(),
        period: full_status.period.unwrap_or_default(),
    };

    let raw_competitors = raw
        .competitors
        .ok_or_else(|| FeedError::missing("competitors", context()))?;
    let count = raw_competitors.len();
    let competitors: [Competitor; 2] = raw_competitors
        .into_iter()
        .map(build_competitor)
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| FeedError::CompetitorCount { event_id: id.clone(), count })?;

    Ok(Event {
        name: text_property(&raw.properties, "name").unwrap_or_default(),
        id,
        scheduled,
        status,
        competitors,
        league,
        league_kind,
    })
}

fn build_competitor(raw: HeaderCompetitor) -> Competitor {
    let props = &raw.properties;
    Competitor {
        name: text_property(props, "displayName").unwrap_or_default(),
        score: text_property(props, "score").unwrap_or_default(),
        is_home: text_property(props, "homeAway").as_deref() == Some("home"),
        logo_url: text_property(props, "logoDark").unwrap_or_default(),
        winner: bool_property(props, "winner").unwrap_or(false),
        properties: raw.properties,
    }
}

/// The header feed sends `2024-05-02T18:00:00Z`, and sometimes drops the seconds.
fn parse_feed_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FEED: &str = r#"{
        "sports": [
            {
                "name": "Football",
                "slug": "football",
                "leagues": [
                    {
                        "name": "National Football League",
                        "shortName": "NFL",
                        "abbreviation": "NFL",
                        "events": [
                            {
                                "id": "401",
                                "name": "Chiefs at Bills",
                                "date": "2024-05-02T18:00:00Z",
                                "fullStatus": {
                                    "type": {"completed": false, "state": "in", "description": "In Progress"},
                                    "displayClock": "7:32",
                                    "period": 2
                                },
                                "competitors": [
                                    {"displayName": "Buffalo Bills", "score": "14", "homeAway": "home",
                                     "logoDark": "https://a.espncdn.com/i/teamlogos/nfl/500-dark/scoreboard/buf.png"},
                                    {"displayName": "Kansas City Chiefs", "score": "10", "homeAway": "away",
                                     "logoDark": "https://a.espncdn.com/i/teamlogos/nfl/500-dark/scoreboard/kc.png"}
                                ]
                            }
                        ]
                    }
                ]
            },
            {
                "name": "Basketball",
                "slug": "basketball",
                "leagues": [
                    {
                        "name": "NBA",
                        "shortName": "NBA",
                        "abbreviation": "NBA",
                        "events": [
                            {
                                "id": "501",
                                "name": "Lakers at Celtics",
                                "date": "2024-05-02T23:30Z",
                                "fullStatus": {
                                    "type": {"completed": true, "state": "post", "description": "Final"},
                                    "displayClock": "0.0",
                                    "period": 4
                                },
                                "competitors": [
                                    {"displayName": "Boston Celtics", "score": "101", "homeAway": "home", "winner": true},
                                    {"displayName": "Los Angeles Lakers", "score": "99", "homeAway": "away", "winner": false}
                                ]
                            },
                            {
                                "id": "502",
                                "name": "Knicks at Heat",
                                "date": "2024-05-03T00:00:00Z",
                                "fullStatus": {"type": {"completed": false, "state": "pre"}},
                                "competitors": [
                                    {"displayName": "Miami Heat", "score": "", "homeAway": "home"},
                                    {"displayName": "New York Knicks", "score": "", "homeAway": "away"}
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn builds_full_tree_with_back_handles() {
        let board = Scoreboard::from_json(FEED).expect("feed should build");
        assert_eq!(board.sports.len(), 2);
        assert_eq!(board.event_count(), 3);

        let nfl = &board.sports[0].leagues[0];
        assert_eq!(nfl.kind, LeagueKind::Nfl);
        assert_eq!(nfl.abbreviation, "NFL");

        let event = &nfl.events[0];
        assert_eq!(event.id, "401");
        assert_eq!(event.league_kind, LeagueKind::Nfl);
        assert_eq!(board.league(event.league).map(|l| l.name.as_str()), Some("National Football League"));
        let sport = board.sport(event.league.sport()).expect("sport handle resolves");
        assert_eq!(sport.name, "Football");
        assert_eq!(sport.properties.get("slug").and_then(|v| v.as_str()), Some("football"));
    }

    #[test]
    fn competitors_keep_feed_order_and_fields() {
        let board = Scoreboard::from_json(FEED).unwrap();
        let event = &board.sports[0].leagues[0].events[0];
        let [home, away] = &event.competitors;
        assert_eq!(home.name, "Buffalo Bills");
        assert!(home.is_home);
        assert_eq!(home.score, "14");
        assert!(home.logo_url.ends_with("buf.png"));
        assert!(!away.is_home);
        assert!(!away.winner, "missing winner flag defaults to false");
    }

    #[test]
    fn status_is_classified_at_build_time() {
        let board = Scoreboard::from_json(FEED).unwrap();
        let events = board.flatten();
        assert_eq!(events[0].status.category, StatusCategory::InProgress);
        assert_eq!(events[0].status.display_clock, "7:32");
        assert_eq!(events[0].status.period, 2);
        assert_eq!(events[1].status.category, StatusCategory::Completed);
        assert_eq!(events[1].status.description, "Final");
        assert_eq!(events[2].status.category, StatusCategory::NotStarted);
        assert_eq!(events[2].status.display_clock, "");
    }

    #[test]
    fn dates_parse_with_and_without_seconds() {
        let board = Scoreboard::from_json(FEED).unwrap();
        let events = board.flatten();
        assert_eq!(events[0].scheduled, Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap());
        assert_eq!(events[1].scheduled, Utc.with_ymd_and_hms(2024, 5, 2, 23, 30, 0).unwrap());
    }

    #[test]
    fn flatten_is_sport_then_league_then_event_order() {
        let board = Scoreboard::from_json(FEED).unwrap();
        let ids: Vec<&str> = board.flatten().into_iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["401", "501", "502"]);
    }

    #[test]
    fn append_repoints_handles_of_merged_sports() {
        let mut board = Scoreboard::from_json(FEED).unwrap();
        let other = Scoreboard::from_json(FEED).unwrap();
        board.append(other);

        assert_eq!(board.sports.len(), 4);
        let merged_event = &board.sports[3].leagues[0].events[0];
        assert_eq!(merged_event.league, LeagueRef { sport: 3, league: 0 });
        assert_eq!(board.sports[3].leagues[0].sport, SportRef(3));
        assert_eq!(board.league(merged_event.league).map(|l| l.short_name.as_str()), Some("NBA"));
    }

    #[test]
    fn missing_sports_key_is_malformed() {
        let err = Scoreboard::from_json(r#"{"leagues": []}"#).unwrap_err();
        assert!(matches!(err, FeedError::MissingKey { key: "sports", .. }), "got {err}");
    }

    #[test]
    fn missing_events_key_is_malformed() {
        let json = r#"{"sports": [{"name": "Hockey", "leagues": [{"name": "NHL"}]}]}"#;
        let err = Scoreboard::from_json(json).unwrap_err();
        assert!(matches!(err, FeedError::MissingKey { key: "events", .. }), "got {err}");
    }

    #[test]
    fn single_competitor_is_malformed() {
        let json = r#"{"sports": [{"name": "Golf", "leagues": [{"name": "PGA", "events": [{
            "id": "9", "date": "2024-05-02T18:00Z",
            "fullStatus": {"type": {"completed": false, "state": "pre"}},
            "competitors": [{"displayName": "Solo"}]
        }]}]}]}"#;
        let err = Scoreboard::from_json(json).unwrap_err();
        assert!(
            matches!(err, FeedError::CompetitorCount { ref event_id, count: 1 } if event_id == "9"),
            "got {err}"
        );
    }

    #[test]
    fn unparseable_date_is_malformed() {
        let json = r#"{"sports": [{"name": "Golf", "leagues": [{"name": "PGA", "events": [{
            "id": "9", "date": "tomorrow-ish",
            "fullStatus": {"type": {"completed": false, "state": "pre"}},
            "competitors": [{}, {}]
        }]}]}]}"#;
        assert!(matches!(Scoreboard::from_json(json), Err(FeedError::InvalidDate { .. })));
    }

    #[test]
    fn empty_sports_list_is_valid() {
        let board = Scoreboard::from_json(r#"{"sports": []}"#).unwrap();
        assert!(board.flatten().is_empty());
    }
}
