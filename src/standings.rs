use std::collections::HashMap;

use serde::Serialize;

use crate::model::{LeagueMatch, ScheduleMatch, Selection};
use crate::normalize::{Outcome, normalize_team_name};
use crate::repository::Repository;

const POINTS_WIN: u32 = 3;
const POINTS_DRAW: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// Deepest knockout stage reached; only orders knockout tables.
    pub round_weight: u32,
}

impl Standing {
    fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, scored: u32, conceded: u32, outcome: Outcome, weight: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        self.round_weight = self.round_weight.max(weight);
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.points += POINTS_WIN;
            }
            Outcome::Draw => {
                self.draws += 1;
                self.points += POINTS_DRAW;
            }
            Outcome::Loss => self.losses += 1,
        }
    }
}

/// League table for one competition, built from the league/cup sheet plus
/// whatever the own team's schedule adds on top of it.
pub fn compute_standings(repo: &Repository, season: &Selection, competition: &str) -> Vec<Standing> {
    let own_team = repo.rules().own_team.as_str();
    let mut matches: Vec<LeagueMatch> = repo
        .league_matches()
        .iter()
        .filter(|m| season.admits(&m.season) && m.competition == competition)
        .cloned()
        .collect();

    let synthesized: Vec<LeagueMatch> = repo
        .schedule_rows()
        .iter()
        .filter(|m| season.admits(&m.season) && m.competition == competition)
        .filter_map(|m| synthesize_from_schedule(m, own_team))
        .collect();

    // The league sheet wins whenever both sources describe the same fixture.
    let extra: Vec<LeagueMatch> = synthesized
        .into_iter()
        .filter(|candidate| {
            !matches
                .iter()
                .any(|existing| is_same_fixture(existing, candidate, own_team))
        })
        .collect();
    matches.extend(extra);

    let mut table = fold_standings(&matches);
    sort_standings(&mut table, repo.rules().is_knockout(competition));
    table
}

/// League-shaped view of a schedule row. The own team is always the home
/// side; rows without a readable score or opponent yield nothing.
pub fn synthesize_from_schedule(fixture: &ScheduleMatch, own_team: &str) -> Option<LeagueMatch> {
    let score = fixture.score().ok()?;
    let opponent = normalize_team_name(&fixture.opponent);
    if opponent.is_empty() {
        return None;
    }
    Some(LeagueMatch {
        season: fixture.season.clone(),
        id: fixture.match_id.clone(),
        competition: fixture.competition.clone(),
        home: own_team.to_string(),
        away: opponent,
        home_score: score.home,
        away_score: score.away,
        date: fixture.date.clone(),
        penalty_winner: score.penalty_winner,
    })
}

/// Duplicate check between a league-sheet match and a schedule-derived one.
///
/// Ids repeat across unrelated fixtures (`1R`, `결승`) and across seasons, so
/// an id match only counts within one season and when the existing match
/// involves the own team. Otherwise the fixture is matched on calendar day
/// plus both teams.
pub fn is_same_fixture(existing: &LeagueMatch, candidate: &LeagueMatch, own_team: &str) -> bool {
    if !existing.involves(own_team) {
        return false;
    }
    if !existing.id.is_empty()
        && existing.id == candidate.id
        && existing.season == candidate.season
    {
        return true;
    }
    same_calendar_day(&existing.date, &candidate.date) && existing.involves(&candidate.away)
}

/// Dates compare on their digits alone, so `2024.03.06`, `2024-03-06` and
/// `2024/03/06` are one day.
pub fn same_calendar_day(a: &str, b: &str) -> bool {
    let digits = |s: &str| s.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    let (a, b) = (digits(a), digits(b));
    !a.is_empty() && a == b
}

/// Knockout stage implied by a match id. Semifinal is tested before final
/// because `준결승` contains `결승`.
pub fn round_weight(match_id: &str) -> u32 {
    if match_id.contains("준결승") || match_id.contains("4강") {
        50
    } else if match_id.contains("결승") && !match_id.contains('준') {
        100
    } else if match_id.contains("8강") {
        25
    } else if match_id.contains("16강") {
        10
    } else {
        0
    }
}

fn fold_standings(matches: &[LeagueMatch]) -> Vec<Standing> {
    let mut order: Vec<String> = Vec::new();
    let mut by_team: HashMap<String, Standing> = HashMap::new();
    for m in matches {
        let weight = round_weight(&m.id);
        let home_outcome = m.score().outcome();
        let away_outcome = match home_outcome {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        };
        for (team, scored, conceded, outcome) in [
            (&m.home, m.home_score, m.away_score, home_outcome),
            (&m.away, m.away_score, m.home_score, away_outcome),
        ] {
            let standing = by_team.entry(team.clone()).or_insert_with(|| {
                order.push(team.clone());
                Standing::new(team)
            });
            standing.record(scored, conceded, outcome, weight);
        }
    }
    order
        .into_iter()
        .filter_map(|team| by_team.remove(&team))
        .collect()
}

fn sort_standings(table: &mut [Standing], knockout: bool) {
    table.sort_by(|a, b| {
        let stage = if knockout {
            b.round_weight.cmp(&a.round_weight)
        } else {
            std::cmp::Ordering::Equal
        };
        stage
            .then(b.points.cmp(&a.points))
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });
}
