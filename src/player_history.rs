use serde::Serialize;

use crate::model::{MatchRecordEntry, ScheduleMatch, Selection};
use crate::normalize::parse_sheet_date;
use crate::repository::Repository;

/// What a player-event listing counts per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goals,
    Assists,
    YellowCards,
    RedCards,
    OwnGoals,
    Appearances,
    CleanSheets,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Goals,
        EventKind::Assists,
        EventKind::YellowCards,
        EventKind::RedCards,
        EventKind::OwnGoals,
        EventKind::Appearances,
        EventKind::CleanSheets,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Goals => "goals",
            EventKind::Assists => "assists",
            EventKind::YellowCards => "yellow_cards",
            EventKind::RedCards => "red_cards",
            EventKind::OwnGoals => "own_goals",
            EventKind::Appearances => "appearances",
            EventKind::CleanSheets => "clean_sheets",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.label() == wanted)
    }

    pub fn count(self, record: &MatchRecordEntry, fixture: &ScheduleMatch) -> u32 {
        match self {
            EventKind::Goals => record.scored(),
            EventKind::Assists => record.assists,
            EventKind::YellowCards => record.yellow_cards,
            EventKind::RedCards => record.red_cards,
            EventKind::OwnGoals => record.own_goals(),
            EventKind::Appearances => 1,
            EventKind::CleanSheets => u32::from(record.keeps_clean_sheet(fixture)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEvent {
    pub season: String,
    pub match_id: String,
    pub round: String,
    pub date: String,
    pub opponent: String,
    pub kind: EventKind,
    pub count: u32,
    pub appearance: String,
    pub goals: i32,
    pub assists: u32,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub season: String,
    pub match_id: String,
    pub round: String,
    pub date: String,
    pub opponent: String,
    pub competition: String,
    pub appearance: String,
    pub goals: i32,
    pub assists: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub attack_points: u32,
    pub note: String,
}

/// Matches in which `player` registered at least one event of `kind`,
/// oldest first. Records whose match is missing from the schedule are skipped.
pub fn player_events(
    repo: &Repository,
    season: &Selection,
    competition: &Selection,
    player: &str,
    kind: EventKind,
) -> Vec<PlayerEvent> {
    let mut events: Vec<PlayerEvent> = repo
        .records()
        .iter()
        .filter(|r| r.name == player && season.admits(&r.season))
        .filter_map(|r| {
            let fixture = repo.schedule_match(&r.season, &r.match_id)?;
            if !competition.admits(&fixture.competition) {
                return None;
            }
            let count = kind.count(r, fixture);
            (count > 0).then(|| PlayerEvent {
                season: r.season.clone(),
                match_id: r.match_id.clone(),
                round: fixture.round.clone(),
                date: fixture.date.clone(),
                opponent: fixture.opponent.clone(),
                kind,
                count,
                appearance: r.appearance_label.clone(),
                goals: r.goals,
                assists: r.assists,
                note: r.note.clone(),
            })
        })
        .collect();
    events.sort_by_key(|e| parse_sheet_date(&e.date));
    events
}

/// Every scheduled match `player` has a record for, oldest first.
pub fn player_match_history(
    repo: &Repository,
    player: &str,
    season: &Selection,
) -> Vec<HistoryEntry> {
    let mut history: Vec<HistoryEntry> = repo
        .records()
        .iter()
        .filter(|r| r.name == player && season.admits(&r.season))
        .filter_map(|r| {
            let fixture = repo.schedule_match(&r.season, &r.match_id)?;
            Some(HistoryEntry {
                season: r.season.clone(),
                match_id: r.match_id.clone(),
                round: fixture.round.clone(),
                date: fixture.date.clone(),
                opponent: fixture.opponent.clone(),
                competition: fixture.competition.clone(),
                appearance: r.appearance_label.clone(),
                goals: r.goals,
                assists: r.assists,
                yellow_cards: r.yellow_cards,
                red_cards: r.red_cards,
                attack_points: r.scored() + r.assists,
                note: r.note.clone(),
            })
        })
        .collect();
    history.sort_by_key(|h| parse_sheet_date(&h.date));
    history
}

#[cfg(test)]
mod tests {
    use super::EventKind;

    #[test]
    fn event_kinds_round_trip_through_labels() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(EventKind::from_label("Yellow-Cards"), Some(EventKind::YellowCards));
        assert_eq!(EventKind::from_label("saves"), None);
    }
}
