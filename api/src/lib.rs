pub mod client;
pub mod espn;
pub mod feed;
pub mod filter;

use chrono::{DateTime, Utc};
use espn::Properties;

pub use feed::FeedError;

// ---------------------------------------------------------------------------
// Domain types, independent of the ESPN wire format
// ---------------------------------------------------------------------------

/// One fetch worth of data. Owns the whole Sport → League → Event tree;
/// children point back up through index handles, never through ownership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
    pub sports: Vec<Sport>,
}

impl Scoreboard {
    pub fn sport(&self, handle: SportRef) -> Option<&Sport> {
        self.sports.get(handle.0)
    }

    pub fn league(&self, handle: LeagueRef) -> Option<&League> {
        self.sports.get(handle.sport)?.leagues.get(handle.league)
    }

    /// Depth-first: sport order, then league order, then event order.
    pub fn flatten(&self) -> Vec<&Event> {
        self.sports
            .iter()
            .flat_map(|s| s.leagues.iter())
            .flat_map(|l| l.events.iter())
            .collect()
    }

    /// Merge another fetch result after our own sports, re-pointing its handles.
    pub fn append(&mut self, other: Scoreboard) {
        for mut sport in other.sports {
            sport.reindex(self.sports.len());
            self.sports.push(sport);
        }
    }

    pub fn event_count(&self) -> usize {
        self.sports
            .iter()
            .flat_map(|s| s.leagues.iter())
            .map(|l| l.events.len())
            .sum()
    }
}

/// Index of a Sport inside its Scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SportRef(pub usize);

/// Position of a League inside its Scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LeagueRef {
    pub sport: usize,
    pub league: usize,
}

impl LeagueRef {
    pub fn sport(&self) -> SportRef {
        SportRef(self.sport)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sport {
    pub name: String,
    pub properties: Properties,
    pub leagues: Vec<League>,
}

impl Sport {
    fn reindex(&mut self, sport: usize) {
        for (league_idx, league) in self.leagues.iter_mut().enumerate() {
            league.sport = SportRef(sport);
            for event in &mut league.events {
                event.league = LeagueRef { sport, league: league_idx };
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub name: String,
    pub short_name: String,
    pub abbreviation: String,
    pub kind: LeagueKind,
    pub sport: SportRef,
    pub properties: Properties,
    pub events: Vec<Event>,
}

/// Display capabilities that differ per league. Carries no extra data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeagueKind {
    #[default]
    Standard,
    Nfl,
}

impl LeagueKind {
    pub fn detect(sport_name: &str, league_short_name: &str) -> Self {
        if sport_name == "Football" && league_short_name == "NFL" {
            LeagueKind::Nfl
        } else {
            LeagueKind::Standard
        }
    }

    pub fn period_label(&self, period: u32) -> String {
        match self {
            LeagueKind::Nfl => match period {
                1..=4 => format!("Q{period}"),
                5 => "OT".to_string(),
                n => format!("{}OT", n - 4),
            },
            LeagueKind::Standard => format!("Period: {period}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub scheduled: DateTime<Utc>,
    pub status: Status,
    /// Home/away order exactly as the feed returned them.
    pub competitors: [Competitor; 2],
    pub league: LeagueRef,
    pub league_kind: LeagueKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Competitor {
    pub name: String,
    pub score: String, // kept as text: empty pre-game, sometimes non-numeric
    pub is_home: bool,
    pub logo_url: String,
    pub winner: bool,
    pub properties: Properties,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCategory {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl StatusCategory {
    pub fn classify(completed: bool, state: &str) -> Self {
        if completed {
            StatusCategory::Completed
        } else if state == "pre" {
            StatusCategory::NotStarted
        } else {
            StatusCategory::InProgress
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub category: StatusCategory,
    pub display_clock: String,
    pub description: String,
    pub period: u32,
}

impl Status {
    pub fn started(&self) -> bool {
        self.category != StatusCategory::NotStarted
    }

    pub fn completed(&self) -> bool {
        self.category == StatusCategory::Completed
    }

    pub fn is_live(&self) -> bool {
        self.category == StatusCategory::InProgress
    }
}
