//! Raw serde shapes of ESPN's scoreboard header feed.
//! These map to the domain types in lib.rs via `feed::build`.
//!
//! Every level keeps its remaining fields in a flattened `properties` map, because
//! filter configs may match on any upstream key (`slug`, `id`, `abbreviation`,
//! `displayName`, ...), not only on the ones we model.
use serde::Deserialize;
use serde_json::{Map, Value};

pub type Properties = Map<String, Value>;

// ---------------------------------------------------------------------------
// Scoreboard header  (apis/v2/scoreboard/header)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderResponse {
    pub sports: Option<Vec<HeaderSport>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderSport {
    pub leagues: Option<Vec<HeaderLeague>>,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderLeague {
    pub events: Option<Vec<HeaderEvent>>,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderEvent {
    pub competitors: Option<Vec<HeaderCompetitor>>,
    #[serde(rename = "fullStatus")]
    pub full_status: Option<HeaderStatus>,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderStatus {
    #[serde(rename = "type")]
    pub status_type: Option<HeaderStatusType>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>,
    pub period: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderStatusType {
    pub completed: Option<bool>,
    pub state: Option<String>, // "pre" | "in" | "post"
    pub description: Option<String>,
}

/// Competitors are read entirely from their properties: `displayName`,
/// `score` (a string on this endpoint), `homeAway`, `logoDark`, `winner`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeaderCompetitor {
    #[serde(flatten)]
    pub properties: Properties,
}

/// Fetch `key` as text. Numbers are rendered, everything else is `None`.
pub fn text_property(properties: &Properties, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn bool_property(properties: &Properties, key: &str) -> Option<bool> {
    properties.get(key).and_then(Value::as_bool)
}

