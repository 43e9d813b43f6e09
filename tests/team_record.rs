use std::path::PathBuf;

use chrono::NaiveDate;
use squad_ledger::config::Rules;
use squad_ledger::model::Selection;
use squad_ledger::player_history::{EventKind, player_events, player_match_history};
use squad_ledger::repository::Repository;
use squad_ledger::source::load_sources_from_dir;
use squad_ledger::team_record::{opponent_breakdown, stadium_breakdown, team_record};

fn fixture_repo() -> Repository {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let texts = load_sources_from_dir(&dir).expect("fixture dir should load");
    Repository::from_sources(&texts, Rules::default())
}

fn end_of_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
}

#[test]
fn season_record_counts_shootout_win() {
    let repo = fixture_repo();
    let record = team_record(&repo, &Selection::only("2024"), &Selection::All, end_of_2024());
    assert_eq!((record.wins, record.draws, record.losses), (3, 1, 2));
    assert_eq!(record.total(), 6);
    assert_eq!(record.win_rate, 50);
}

#[test]
fn all_time_record_reads_narrative_results() {
    let repo = fixture_repo();
    let record = team_record(&repo, &Selection::All, &Selection::All, end_of_2024());
    assert_eq!((record.wins, record.draws, record.losses), (4, 1, 2));
    assert_eq!(record.win_rate, 57);
}

#[test]
fn stadium_breakdown_uses_full_names_and_skips_unknown() {
    let repo = fixture_repo();
    let rows = stadium_breakdown(&repo, &Selection::All, &Selection::All, end_of_2024());
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["성내유수지 체육공원", "광나루 구장"]);
    assert_eq!((rows[0].wins, rows[0].draws, rows[0].losses), (2, 0, 1));
    assert_eq!(rows[0].win_rate, 67);
    assert_eq!(rows[1].total, 3);
}

#[test]
fn opponent_breakdown_orders_by_games_played() {
    let repo = fixture_repo();
    let rows = opponent_breakdown(&repo, &Selection::only("2024"), &Selection::All, end_of_2024());
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["목요일", "화요일", "금야간"]);
    assert_eq!((rows[0].wins, rows[0].losses), (2, 1));
    assert_eq!(rows[2].draws, 1);
}

#[test]
fn seasons_and_competitions_are_listed() {
    let repo = fixture_repo();
    assert_eq!(repo.available_seasons(), vec!["2024", "2023"]);
    assert_eq!(repo.available_competitions(), vec!["리그", "컵", "연습경기"]);
    assert_eq!(repo.schedule(&Selection::only("2023")).len(), 1);
    assert_eq!(repo.match_records("2024", "4R").len(), 5);
}

#[test]
fn player_goal_events_are_dated_oldest_first() {
    let repo = fixture_repo();
    let events = player_events(
        &repo,
        &Selection::only("2024"),
        &Selection::All,
        "최공격",
        EventKind::Goals,
    );
    let ids: Vec<&str> = events.iter().map(|e| e.match_id.as_str()).collect();
    assert_eq!(ids, vec!["1R", "4R", "연1"]);
    assert_eq!(events[2].count, 5);
    assert_eq!(events[0].opponent, "목요일");
}

#[test]
fn clean_sheet_events_follow_the_stats_rule() {
    let repo = fixture_repo();
    let keeper = player_events(
        &repo,
        &Selection::only("2024"),
        &Selection::All,
        "김골키",
        EventKind::CleanSheets,
    );
    let ids: Vec<&str> = keeper.iter().map(|e| e.match_id.as_str()).collect();
    assert_eq!(ids, vec!["4R", "연1"]);

    let unused = player_events(
        &repo,
        &Selection::only("2024"),
        &Selection::All,
        "한은퇴",
        EventKind::CleanSheets,
    );
    assert!(unused.is_empty());
}

#[test]
fn match_history_joins_schedule_details() {
    let repo = fixture_repo();
    let history = player_match_history(&repo, "박수비", &Selection::only("2024"));
    let ids: Vec<&str> = history.iter().map(|h| h.match_id.as_str()).collect();
    assert_eq!(ids, vec!["1R", "2R", "3R", "4R"]);
    assert_eq!(history[2].goals, -1);
    assert_eq!(history[2].attack_points, 0);
    assert_eq!(history[0].attack_points, 1);
    assert_eq!(history[3].appearance, "교체");
    assert_eq!(history[0].competition, "리그");
}
