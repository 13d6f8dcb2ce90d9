//! Hierarchical allow-list: sport → league → (optional) competitor.
//!
//! A filter node matches a candidate when *any* one of its keys is present on
//! the candidate with an equal value, not when all of them are.
use crate::espn::Properties;
use crate::{Event, Scoreboard};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub sports: Vec<SportFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportFilter {
    #[serde(default)]
    pub leagues: Vec<LeagueFilter>,
    #[serde(flatten)]
    pub match_keys: Properties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueFilter {
    /// `None` admits every event in the league.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<CompetitorFilter>>,
    #[serde(flatten)]
    pub match_keys: Properties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorFilter {
    #[serde(flatten)]
    pub match_keys: Properties,
}

/// OR-match: first shared key with an equal value wins.
pub fn matches_any(match_keys: &Properties, candidate: &Properties) -> bool {
    match_keys
        .iter()
        .any(|(key, value)| candidate.get(key) == Some(value))
}

/// Keep the events admitted by `spec`, in input order, each id at most once.
pub fn filter_events<'a>(board: &Scoreboard, events: &[&'a Event], spec: &FilterSpec) -> Vec<&'a Event> {
    let mut seen: HashSet<&str> = HashSet::new();
    events
        .iter()
        .copied()
        .filter(|event| is_admitted(board, event, spec))
        .filter(|event| seen.insert(event.id.as_str()))
        .collect()
}

fn is_admitted(board: &Scoreboard, event: &Event, spec: &FilterSpec) -> bool {
    let Some(league) = board.league(event.league) else {
        return false;
    };
    let Some(sport) = board.sport(league.sport) else {
        return false;
    };

    spec.sports
        .iter()
        .filter(|sport_filter| matches_any(&sport_filter.match_keys, &sport.properties))
        .flat_map(|sport_filter| sport_filter.leagues.iter())
        .filter(|league_filter| matches_any(&league_filter.match_keys, &league.properties))
        .any(|league_filter| match &league_filter.competitors {
            None => true,
            Some(competitor_filters) => competitor_filters.iter().any(|cf| {
                event
                    .competitors
                    .iter()
                    .any(|c| matches_any(&cf.match_keys, &c.properties))
            }),
        })
}

/// Lower-cased `(sport slug, league abbreviation)` pairs used to build
/// per-league queries, one per sport × league entry in filter order.
pub fn sport_league_pairs(spec: &FilterSpec) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for sport in &spec.sports {
        let Some(slug) = sport.match_keys.get("slug").and_then(|v| v.as_str()) else {
            warn!("sport filter without a `slug` is skipped for fetching: {:?}", sport.match_keys);
            continue;
        };
        for league in &sport.leagues {
            let Some(abbrev) = league.match_keys.get("abbreviation").and_then(|v| v.as_str()) else {
                warn!("league filter under {slug} without an `abbreviation` is skipped for fetching");
                continue;
            };
            pairs.push((slug.to_lowercase(), abbrev.to_lowercase()));
        }
    }
    pairs
}
