use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::{
    Outcome, Score, ScoreError, Side, classify_result_text, find_score, parse_sheet_date,
};

const START_LABELS: &[&str] = &["선발", "START", "O"];
const SUBSTITUTE_LABELS: &[&str] = &["교체", "SUB"];
const DEFENDER_CODES: &[&str] = &["DF", "CB", "WB", "LB", "RB", "LWB", "RWB"];

/// Season or competition filter. `All` admits every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    /// Empty input and `all` (any case) select everything.
    pub fn from_arg(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: String,
    pub position: String,
    pub seasons: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleMatch {
    pub season: String,
    pub match_id: String,
    pub competition: String,
    pub round: String,
    pub date: String,
    pub time: String,
    pub stadium: String,
    pub opponent: String,
    pub result: String,
    pub video_url: Option<String>,
}

impl ScheduleMatch {
    /// Score from the own team's side (listed first in the schedule sheet).
    pub fn score(&self) -> Result<Score, ScoreError> {
        find_score(&self.result)
    }

    /// `None` means the result is still unresolved.
    pub fn outcome(&self) -> Option<Outcome> {
        classify_result_text(&self.result)
    }

    pub fn played_on(&self) -> Option<NaiveDate> {
        parse_sheet_date(&self.date)
    }

    pub fn has_result(&self) -> bool {
        !self.result.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueMatch {
    pub season: String,
    pub id: String,
    pub competition: String,
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub date: String,
    pub penalty_winner: Option<Side>,
}

impl LeagueMatch {
    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    pub fn score(&self) -> Score {
        Score {
            home: self.home_score,
            away: self.away_score,
            penalty_winner: self.penalty_winner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceKind {
    Start,
    Substitute,
    Unknown,
}

impl AppearanceKind {
    pub fn from_label(raw: &str) -> Self {
        let label = raw.trim().to_ascii_uppercase();
        if START_LABELS.contains(&label.as_str()) {
            AppearanceKind::Start
        } else if SUBSTITUTE_LABELS.contains(&label.as_str()) {
            AppearanceKind::Substitute
        } else {
            AppearanceKind::Unknown
        }
    }

    pub fn played(self) -> bool {
        matches!(self, AppearanceKind::Start | AppearanceKind::Substitute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecordEntry {
    pub season: String,
    pub match_id: String,
    pub position: String,
    pub name: String,
    pub appearance: AppearanceKind,
    pub appearance_label: String,
    /// Negative values record own goals.
    pub goals: i32,
    pub assists: u32,
    pub note: String,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl MatchRecordEntry {
    pub fn scored(&self) -> u32 {
        self.goals.max(0).unsigned_abs()
    }

    pub fn own_goals(&self) -> u32 {
        self.goals.min(0).unsigned_abs()
    }

    /// Position held in this match, not the roster position.
    pub fn is_back_line(&self) -> bool {
        let pos = self.position.trim().to_ascii_uppercase();
        pos == "GK" || DEFENDER_CODES.contains(&pos.as_str()) || pos.contains("DF")
    }

    /// Goalkeepers and defenders who took the field in a match the team
    /// finished without conceding.
    pub fn keeps_clean_sheet(&self, fixture: &ScheduleMatch) -> bool {
        if !self.is_back_line() || !self.appearance.played() {
            return false;
        }
        fixture.score().is_ok_and(|score| score.away == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StadiumAlias {
    pub code: String,
    pub name: String,
}
