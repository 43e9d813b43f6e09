use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{AppearanceKind, MatchRecordEntry, ScheduleMatch, Selection};
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsFilter {
    pub season: Selection,
    pub competition: Selection,
    /// Matches dated after this day are treated as not yet played.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub name: String,
    pub position: String,
    pub appearances: u32,
    pub starts: u32,
    pub substitutes: u32,
    pub goals: u32,
    pub assists: u32,
    pub own_goals: u32,
    pub attack_points: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub clean_sheets: u32,
}

impl PlayerStats {
    fn new(name: &str, position: &str) -> Self {
        Self {
            name: name.to_string(),
            position: position.to_string(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, record: &MatchRecordEntry, fixture: &ScheduleMatch) {
        self.appearances += 1;
        match record.appearance {
            AppearanceKind::Start => self.starts += 1,
            AppearanceKind::Substitute => self.substitutes += 1,
            AppearanceKind::Unknown => {}
        }
        self.goals += record.scored();
        self.own_goals += record.own_goals();
        self.assists += record.assists;
        self.yellow_cards += record.yellow_cards;
        self.red_cards += record.red_cards;
        if record.keeps_clean_sheet(fixture) {
            self.clean_sheets += 1;
        }
        self.attack_points = self.goals + self.assists;
    }
}

/// Countable leaderboard columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Goals,
    Assists,
    AttackPoints,
    Appearances,
    CleanSheets,
    OwnGoals,
    YellowCards,
    RedCards,
}

impl Metric {
    pub fn value(self, stats: &PlayerStats) -> u32 {
        match self {
            Metric::Goals => stats.goals,
            Metric::Assists => stats.assists,
            Metric::AttackPoints => stats.attack_points,
            Metric::Appearances => stats.appearances,
            Metric::CleanSheets => stats.clean_sheets,
            Metric::OwnGoals => stats.own_goals,
            Metric::YellowCards => stats.yellow_cards,
            Metric::RedCards => stats.red_cards,
        }
    }

    /// Boards where a zero row carries no information.
    fn needs_positive(self) -> bool {
        matches!(self, Metric::CleanSheets | Metric::OwnGoals)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub name: String,
    pub appearances: u32,
    pub goals_per_game: f64,
    pub assists_per_game: f64,
    pub points_per_game: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboards {
    pub top_scorers: Vec<PlayerStats>,
    pub top_assists: Vec<PlayerStats>,
    pub top_attack_points: Vec<PlayerStats>,
    pub top_appearances: Vec<PlayerStats>,
    pub top_clean_sheets: Vec<PlayerStats>,
    pub top_own_goals: Vec<PlayerStats>,
    pub top_yellow_cards: Vec<PlayerStats>,
    pub top_red_cards: Vec<PlayerStats>,
    pub top_efficiency: Vec<EfficiencyRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsBundle {
    pub players: Vec<PlayerStats>,
    pub leaderboards: Leaderboards,
}

pub fn compute_stats(repo: &Repository, filter: &StatsFilter) -> StatsBundle {
    let window: HashMap<(&str, &str), &ScheduleMatch> = repo
        .completed_matches(&filter.season, &filter.competition, filter.as_of)
        .map(|m| ((m.season.as_str(), m.match_id.as_str()), m))
        .collect();

    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, PlayerStats> = HashMap::new();

    for player in repo.players() {
        let member = match &filter.season {
            Selection::All => true,
            Selection::Only(season) => player.seasons.contains(season),
        };
        if member && !by_name.contains_key(&player.name) {
            order.push(player.name.clone());
            by_name.insert(
                player.name.clone(),
                PlayerStats::new(&player.name, &player.position),
            );
        }
    }

    for record in repo.records() {
        let Some(fixture) = window.get(&(record.season.as_str(), record.match_id.as_str())) else {
            continue;
        };
        let stats = by_name.entry(record.name.clone()).or_insert_with(|| {
            order.push(record.name.clone());
            PlayerStats::new(&record.name, &record.position)
        });
        stats.absorb(record, fixture);
    }

    let mut players: Vec<PlayerStats> = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect();
    players.sort_by(|a, b| {
        b.attack_points
            .cmp(&a.attack_points)
            .then(b.goals.cmp(&a.goals))
            .then(b.assists.cmp(&a.assists))
            .then(b.appearances.cmp(&a.appearances))
            .then_with(|| a.name.cmp(&b.name))
    });

    let size = repo.rules().leaderboard_size;
    let leaderboards = Leaderboards {
        top_scorers: leaderboard(&players, Metric::Goals, size),
        top_assists: leaderboard(&players, Metric::Assists, size),
        top_attack_points: leaderboard(&players, Metric::AttackPoints, size),
        top_appearances: leaderboard(&players, Metric::Appearances, size),
        top_clean_sheets: leaderboard(&players, Metric::CleanSheets, size),
        top_own_goals: leaderboard(&players, Metric::OwnGoals, size),
        top_yellow_cards: leaderboard(&players, Metric::YellowCards, size),
        top_red_cards: leaderboard(&players, Metric::RedCards, size),
        top_efficiency: efficiency_board(&players, size),
    };

    StatsBundle {
        players,
        leaderboards,
    }
}

/// Top `size` players on one metric; ties go to more appearances, then name.
pub fn leaderboard(players: &[PlayerStats], metric: Metric, size: usize) -> Vec<PlayerStats> {
    let mut rows: Vec<PlayerStats> = players
        .iter()
        .filter(|p| !metric.needs_positive() || metric.value(p) > 0)
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        metric
            .value(b)
            .cmp(&metric.value(a))
            .then(b.appearances.cmp(&a.appearances))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows.truncate(size);
    rows
}

/// Per-game rates. Players without an appearance are left out.
pub fn efficiency_board(players: &[PlayerStats], size: usize) -> Vec<EfficiencyRow> {
    let mut rows: Vec<EfficiencyRow> = players
        .iter()
        .filter(|p| p.appearances > 0)
        .map(|p| {
            let games = f64::from(p.appearances);
            EfficiencyRow {
                name: p.name.clone(),
                appearances: p.appearances,
                goals_per_game: f64::from(p.goals) / games,
                assists_per_game: f64::from(p.assists) / games,
                points_per_game: f64::from(p.goals + p.assists) / games,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.points_per_game
            .partial_cmp(&a.points_per_game)
            .unwrap_or(Ordering::Equal)
            .then(b.appearances.cmp(&a.appearances))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows.truncate(size);
    rows
}
