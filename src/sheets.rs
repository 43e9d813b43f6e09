//! Record parsers for the five published sheets.
//!
//! Column positions are a fixed contract with the spreadsheet owners. Rows
//! that are too short or lack their key field are dropped and counted; a
//! hand-maintained sheet always has a few of those.

use std::collections::BTreeSet;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    AppearanceKind, LeagueMatch, MatchRecordEntry, Player, ScheduleMatch, StadiumAlias,
};
use crate::normalize::{normalize_team_name, parse_score_expression};

const SEASON_SUFFIX: &str = "시즌";
const ROSTER_POSITION_HEADER: &str = "포지션";
const ROSTER_NAME_HEADER: &str = "이름";
const ACTIVE_MARKS: &[&str] = &["O", "1", "TRUE", "Y", "YES"];

const SCHEDULE_MIN_COLUMNS: usize = 2;
const RECORDS_MIN_COLUMNS: usize = 4;
const STADIUM_MIN_COLUMNS: usize = 2;
const LEAGUE_MIN_COLUMNS: usize = 9;

static LEADING_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<count>-?[0-9]+)").expect("valid regex"));

pub type Grid = Vec<Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetParse<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

impl<T> SheetParse<T> {
    fn collect(
        sheet: &str,
        data: &[Vec<String>],
        parse_row: impl Fn(&[String]) -> Option<T>,
    ) -> Self {
        let mut rows = Vec::with_capacity(data.len());
        let mut dropped = 0usize;
        for row in data {
            match parse_row(row.as_slice()) {
                Some(item) => rows.push(item),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!("{sheet}: dropped {dropped} malformed row(s)");
        }
        Self { rows, dropped }
    }
}

/// Splits delimited text into rows of cells. Quoted cells are honored and
/// rows may differ in width.
pub fn split_grid(text: &str) -> Grid {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.trim().as_bytes());
    let mut grid = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => grid.push(record.iter().map(|cell| cell.to_string()).collect()),
            Err(err) => debug!("skipping unreadable line: {err}"),
        }
    }
    grid
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn season_label(raw: &str) -> String {
    raw.trim().replace(SEASON_SUFFIX, "").trim().to_string()
}

/// Leading signed integer, `0` when the cell is blank or not a number.
fn parse_count(raw: &str) -> i32 {
    LEADING_COUNT
        .captures(raw)
        .and_then(|caps| caps["count"].parse::<i32>().ok())
        .unwrap_or(0)
}

fn parse_tally(raw: &str) -> u32 {
    parse_count(raw).max(0).unsigned_abs()
}

fn data_rows(grid: &[Vec<String>]) -> &[Vec<String>] {
    grid.get(1..).unwrap_or(&[])
}

/// Roster: position and name columns are located by header; every header
/// that looks like a season (`2024`, `2025시즌`) becomes a membership column.
pub fn parse_roster(grid: &[Vec<String>]) -> SheetParse<Player> {
    let Some(headers) = grid.first() else {
        return SheetParse { rows: Vec::new(), dropped: 0 };
    };
    let headers: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    let position_idx = headers.iter().position(|h| *h == ROSTER_POSITION_HEADER);
    let name_idx = headers.iter().position(|h| *h == ROSTER_NAME_HEADER);
    let (Some(position_idx), Some(name_idx)) = (position_idx, name_idx) else {
        warn!("roster: missing '{ROSTER_POSITION_HEADER}'/'{ROSTER_NAME_HEADER}' header");
        return SheetParse {
            rows: Vec::new(),
            dropped: data_rows(grid).len(),
        };
    };
    let season_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| season_header(h).map(|label| (idx, label)))
        .collect();

    SheetParse::collect("roster", data_rows(grid), |row| {
        if row.len() <= position_idx.max(name_idx) {
            return None;
        }
        let name = cell(row, name_idx);
        if name.is_empty() {
            return None;
        }
        let seasons: BTreeSet<String> = season_columns
            .iter()
            .filter(|(idx, _)| {
                let mark = cell(row, *idx).to_ascii_uppercase();
                ACTIVE_MARKS.contains(&mark.as_str())
            })
            .map(|(_, label)| label.clone())
            .collect();
        Some(Player {
            name: name.to_string(),
            position: cell(row, position_idx).to_string(),
            seasons,
        })
    })
}

fn season_header(header: &str) -> Option<String> {
    if let Some(year) = header.strip_suffix(SEASON_SUFFIX) {
        let year = year.trim();
        if !year.is_empty() {
            return Some(year.to_string());
        }
        return None;
    }
    if header.len() == 4 && header.chars().all(|c| c.is_ascii_digit()) {
        return Some(header.to_string());
    }
    None
}

/// Schedule: season, match id, competition, date, time, stadium, opponent,
/// result, video link.
pub fn parse_schedule(grid: &[Vec<String>]) -> SheetParse<ScheduleMatch> {
    SheetParse::collect("schedule", data_rows(grid), |row| {
        if row.len() < SCHEDULE_MIN_COLUMNS {
            return None;
        }
        let match_id = cell(row, 1);
        if match_id.is_empty() {
            return None;
        }
        let video = cell(row, 8);
        Some(ScheduleMatch {
            season: season_label(cell(row, 0)),
            match_id: match_id.to_string(),
            competition: cell(row, 2).to_string(),
            round: cell(row, 2).to_string(),
            date: cell(row, 3).to_string(),
            time: cell(row, 4).to_string(),
            stadium: cell(row, 5).to_string(),
            opponent: cell(row, 6).to_string(),
            result: cell(row, 7).to_string(),
            video_url: (!video.is_empty()).then(|| video.to_string()),
        })
    })
}

/// Per-player match records: season, match id, position, name, appearance,
/// goals, assists, note, yellow cards, red cards.
pub fn parse_records(grid: &[Vec<String>]) -> SheetParse<MatchRecordEntry> {
    SheetParse::collect("records", data_rows(grid), |row| {
        if row.len() < RECORDS_MIN_COLUMNS {
            return None;
        }
        let match_id = cell(row, 1);
        let name = cell(row, 3);
        if match_id.is_empty() || name.is_empty() {
            return None;
        }
        let appearance_label = cell(row, 4);
        Some(MatchRecordEntry {
            season: season_label(cell(row, 0)),
            match_id: match_id.to_string(),
            position: cell(row, 2).to_string(),
            name: name.to_string(),
            appearance: AppearanceKind::from_label(appearance_label),
            appearance_label: appearance_label.to_string(),
            goals: parse_count(cell(row, 5)),
            assists: parse_tally(cell(row, 6)),
            note: cell(row, 7).to_string(),
            yellow_cards: parse_tally(cell(row, 8)),
            red_cards: parse_tally(cell(row, 9)),
        })
    })
}

pub fn parse_stadiums(grid: &[Vec<String>]) -> SheetParse<StadiumAlias> {
    SheetParse::collect("stadiums", data_rows(grid), |row| {
        if row.len() < STADIUM_MIN_COLUMNS {
            return None;
        }
        let code = cell(row, 0);
        if code.is_empty() {
            return None;
        }
        Some(StadiumAlias {
            code: code.to_string(),
            name: cell(row, 1).to_string(),
        })
    })
}

/// League/cup sheet covering every team: season, id, competition, date,
/// time, stadium, home, away, result. Rows without a readable regulation
/// score are dropped.
pub fn parse_league_matches(grid: &[Vec<String>]) -> SheetParse<LeagueMatch> {
    SheetParse::collect("league", data_rows(grid), |row| {
        if row.len() < LEAGUE_MIN_COLUMNS {
            return None;
        }
        let score = parse_score_expression(cell(row, 8)).ok()?;
        let home = normalize_team_name(cell(row, 6));
        let away = normalize_team_name(cell(row, 7));
        if home.is_empty() || away.is_empty() {
            return None;
        }
        Some(LeagueMatch {
            season: season_label(cell(row, 0)),
            id: cell(row, 1).to_string(),
            competition: cell(row, 2).to_string(),
            home,
            away,
            home_score: score.home,
            away_score: score.away,
            date: cell(row, 3).to_string(),
            penalty_winner: score.penalty_winner,
        })
    })
}
