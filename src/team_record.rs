use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{ScheduleMatch, Selection};
use crate::normalize::Outcome;
use crate::repository::Repository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Rounded percentage of wins among decided matches.
    pub win_rate: u32,
}

impl TeamRecord {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.win_rate = win_rate(self.wins, self.total());
    }

    pub fn total(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub name: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: u32,
}

fn win_rate(wins: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(wins) * 100.0 / f64::from(total)).round() as u32
}

/// Own team's win/draw/loss over completed schedule rows.
pub fn team_record(
    repo: &Repository,
    season: &Selection,
    competition: &Selection,
    as_of: NaiveDate,
) -> TeamRecord {
    let mut record = TeamRecord::default();
    for fixture in repo.completed_matches(season, competition, as_of) {
        if let Some(outcome) = fixture.outcome() {
            record.add(outcome);
        }
    }
    record
}

/// Results grouped by full venue name. Rows with no known venue are skipped.
pub fn stadium_breakdown(
    repo: &Repository,
    season: &Selection,
    competition: &Selection,
    as_of: NaiveDate,
) -> Vec<Breakdown> {
    group_results(repo, season, competition, as_of, |fixture| {
        let name = repo.stadium_name(&fixture.stadium);
        let known = !name.trim().is_empty() && !name.to_lowercase().contains("unknown");
        known.then_some(name)
    })
}

/// Results grouped by opponent as written in the schedule.
pub fn opponent_breakdown(
    repo: &Repository,
    season: &Selection,
    competition: &Selection,
    as_of: NaiveDate,
) -> Vec<Breakdown> {
    group_results(repo, season, competition, as_of, |fixture| {
        let name = fixture.opponent.trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn group_results(
    repo: &Repository,
    season: &Selection,
    competition: &Selection,
    as_of: NaiveDate,
    key_of: impl Fn(&ScheduleMatch) -> Option<String>,
) -> Vec<Breakdown> {
    let mut groups: HashMap<String, TeamRecord> = HashMap::new();
    for fixture in repo.completed_matches(season, competition, as_of) {
        let Some(outcome) = fixture.outcome() else {
            continue;
        };
        let Some(key) = key_of(fixture) else {
            continue;
        };
        groups.entry(key).or_default().add(outcome);
    }
    let mut out: Vec<Breakdown> = groups
        .into_iter()
        .map(|(name, rec)| Breakdown {
            name,
            wins: rec.wins,
            draws: rec.draws,
            losses: rec.losses,
            total: rec.total(),
            win_rate: rec.win_rate,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::win_rate;

    #[test]
    fn win_rate_rounds_to_nearest_percent() {
        assert_eq!(win_rate(0, 0), 0);
        assert_eq!(win_rate(1, 3), 33);
        assert_eq!(win_rate(2, 3), 67);
        assert_eq!(win_rate(3, 3), 100);
    }
}
