use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use log::info;

use crate::config::Rules;
use crate::model::{
    LeagueMatch, MatchRecordEntry, Player, ScheduleMatch, Selection, StadiumAlias,
};
use crate::sheets::{
    parse_league_matches, parse_records, parse_roster, parse_schedule, parse_stadiums, split_grid,
};

/// Raw text of the five sheets, as retrieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTexts {
    pub roster: String,
    pub schedule: String,
    pub records: String,
    pub stadiums: String,
    pub league: String,
}

/// Immutable snapshot of every parsed sheet. Rebuilt from scratch on each
/// refresh; all queries read from one of these.
#[derive(Debug, Clone)]
pub struct Repository {
    rules: Rules,
    players: Vec<Player>,
    schedule: Vec<ScheduleMatch>,
    records: Vec<MatchRecordEntry>,
    stadiums: HashMap<String, String>,
    league_matches: Vec<LeagueMatch>,
    schedule_index: HashMap<(String, String), usize>,
}

impl Repository {
    pub fn from_sources(texts: &SourceTexts, rules: Rules) -> Self {
        let players = parse_roster(&split_grid(&texts.roster)).rows;
        let schedule = parse_schedule(&split_grid(&texts.schedule)).rows;
        let records = parse_records(&split_grid(&texts.records)).rows;
        let stadiums = parse_stadiums(&split_grid(&texts.stadiums)).rows;
        let league = parse_league_matches(&split_grid(&texts.league)).rows;
        let repo = Self::from_parts(rules, players, schedule, records, stadiums, league);
        info!(
            "snapshot built: players={} schedule={} records={} stadiums={} league_matches={}",
            repo.players.len(),
            repo.schedule.len(),
            repo.records.len(),
            repo.stadiums.len(),
            repo.league_matches.len()
        );
        repo
    }

    pub fn from_parts(
        rules: Rules,
        players: Vec<Player>,
        schedule: Vec<ScheduleMatch>,
        records: Vec<MatchRecordEntry>,
        stadiums: Vec<StadiumAlias>,
        league_matches: Vec<LeagueMatch>,
    ) -> Self {
        // Later rows win when the sheet repeats a (season, match id) pair.
        let schedule_index = schedule
            .iter()
            .enumerate()
            .map(|(idx, m)| ((m.season.clone(), m.match_id.clone()), idx))
            .collect();
        let stadiums = stadiums.into_iter().map(|s| (s.code, s.name)).collect();
        Self {
            rules,
            players,
            schedule,
            records,
            stadiums,
            league_matches,
            schedule_index,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn schedule_rows(&self) -> &[ScheduleMatch] {
        &self.schedule
    }

    pub fn records(&self) -> &[MatchRecordEntry] {
        &self.records
    }

    pub fn league_matches(&self) -> &[LeagueMatch] {
        &self.league_matches
    }

    pub fn schedule_match(&self, season: &str, match_id: &str) -> Option<&ScheduleMatch> {
        let idx = self
            .schedule_index
            .get(&(season.to_string(), match_id.to_string()))?;
        self.schedule.get(*idx)
    }

    /// Every season mentioned anywhere in the snapshot, newest first.
    pub fn available_seasons(&self) -> Vec<String> {
        let mut seasons: BTreeSet<&str> = BTreeSet::new();
        seasons.extend(self.schedule.iter().map(|m| m.season.as_str()));
        seasons.extend(self.records.iter().map(|r| r.season.as_str()));
        for player in &self.players {
            seasons.extend(player.seasons.iter().map(|s| s.as_str()));
        }
        seasons
            .into_iter()
            .rev()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// Competition types seen in the schedule: known labels in display order,
    /// then the rest alphabetically.
    pub fn available_competitions(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .schedule
            .iter()
            .map(|m| m.competition.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        let order = &self.rules.competition_order;
        let mut out: Vec<String> = distinct.into_iter().map(|c| c.to_string()).collect();
        out.sort_by_key(|c| {
            let rank = order.iter().position(|o| o == c).unwrap_or(order.len());
            (rank, c.clone())
        });
        out
    }

    /// Full venue name for a short code; unknown codes come back unchanged.
    pub fn stadium_name(&self, code: &str) -> String {
        let code = code.trim();
        if code.is_empty() {
            return String::new();
        }
        self.stadiums
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    pub fn schedule(&self, season: &Selection) -> Vec<&ScheduleMatch> {
        self.schedule
            .iter()
            .filter(|m| season.admits(&m.season))
            .collect()
    }

    /// Raw records for one match, whether or not the schedule knows it.
    pub fn match_records(&self, season: &str, match_id: &str) -> Vec<&MatchRecordEntry> {
        self.records
            .iter()
            .filter(|r| r.season == season && r.match_id == match_id)
            .collect()
    }

    /// Schedule rows that have been played by `as_of` and carry a result.
    /// Practice matches only show up when asked for by name.
    pub fn completed_matches<'a>(
        &'a self,
        season: &'a Selection,
        competition: &'a Selection,
        as_of: NaiveDate,
    ) -> impl Iterator<Item = &'a ScheduleMatch> + 'a {
        self.schedule.iter().filter(move |m| {
            if !season.admits(&m.season) || !competition.admits(&m.competition) {
                return false;
            }
            if competition.is_all() && m.competition == self.rules.practice_label {
                return false;
            }
            if !m.has_result() {
                return false;
            }
            m.played_on().is_some_and(|date| date <= as_of)
        })
    }
}

/// Holds the current snapshot. Readers keep whatever `Arc` they were handed
/// even after a refresh swaps in a new one.
#[derive(Debug)]
pub struct SnapshotCell {
    current: RwLock<Arc<Repository>>,
}

impl SnapshotCell {
    pub fn new(repo: Repository) -> Self {
        Self {
            current: RwLock::new(Arc::new(repo)),
        }
    }

    pub fn current(&self) -> Arc<Repository> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, repo: Repository) -> Arc<Repository> {
        let next = Arc::new(repo);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(season: &str, id: &str, competition: &str) -> ScheduleMatch {
        ScheduleMatch {
            season: season.to_string(),
            match_id: id.to_string(),
            competition: competition.to_string(),
            round: competition.to_string(),
            date: "2024.03.06".to_string(),
            time: "21:00".to_string(),
            stadium: "S1".to_string(),
            opponent: "목요일".to_string(),
            result: "1:0".to_string(),
            video_url: None,
        }
    }

    #[test]
    fn competitions_follow_display_order_then_alphabet() {
        let schedule = vec![
            fixture("2024", "1R", "친선"),
            fixture("2024", "2R", "컵"),
            fixture("2024", "3R", "리그"),
            fixture("2024", "4R", "연습경기"),
            fixture("2024", "5R", "가을대회"),
        ];
        let repo = Repository::from_parts(
            Rules::default(),
            Vec::new(),
            schedule,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(
            repo.available_competitions(),
            vec!["리그", "컵", "연습경기", "가을대회", "친선"]
        );
    }

    #[test]
    fn snapshot_cell_keeps_old_snapshot_alive() {
        let empty = || {
            Repository::from_parts(
                Rules::default(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            )
        };
        let cell = SnapshotCell::new(empty());
        let before = cell.current();
        let mut next = empty();
        next.schedule.push(fixture("2025", "1R", "리그"));
        cell.replace(next);
        assert!(before.schedule_rows().is_empty());
        assert_eq!(cell.current().schedule_rows().len(), 1);
    }

    #[test]
    fn unknown_stadium_codes_fall_back_to_code() {
        let repo = Repository::from_parts(
            Rules::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![StadiumAlias {
                code: "S1".to_string(),
                name: "성내유수지 체육공원".to_string(),
            }],
            Vec::new(),
        );
        assert_eq!(repo.stadium_name("S1"), "성내유수지 체육공원");
        assert_eq!(repo.stadium_name("S9"), "S9");
        assert_eq!(repo.stadium_name(" "), "");
    }
}
