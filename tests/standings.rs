use std::path::PathBuf;

use squad_ledger::config::Rules;
use squad_ledger::model::{LeagueMatch, ScheduleMatch, Selection};
use squad_ledger::normalize::Side;
use squad_ledger::repository::Repository;
use squad_ledger::source::load_sources_from_dir;
use squad_ledger::standings::{Standing, compute_standings};

fn fixture_repo() -> Repository {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let texts = load_sources_from_dir(&dir).expect("fixture dir should load");
    Repository::from_sources(&texts, Rules::default())
}

fn league_match(id: &str, date: &str, home: &str, away: &str, score: (u32, u32)) -> LeagueMatch {
    LeagueMatch {
        season: "2024".to_string(),
        id: id.to_string(),
        competition: "리그".to_string(),
        home: home.to_string(),
        away: away.to_string(),
        home_score: score.0,
        away_score: score.1,
        date: date.to_string(),
        penalty_winner: None,
    }
}

fn schedule_row(id: &str, date: &str, opponent: &str, result: &str) -> ScheduleMatch {
    ScheduleMatch {
        season: "2024".to_string(),
        match_id: id.to_string(),
        competition: "리그".to_string(),
        round: "리그".to_string(),
        date: date.to_string(),
        time: "21:00".to_string(),
        stadium: "S1".to_string(),
        opponent: opponent.to_string(),
        result: result.to_string(),
        video_url: None,
    }
}

fn repo_with(league: Vec<LeagueMatch>, schedule: Vec<ScheduleMatch>) -> Repository {
    Repository::from_parts(
        Rules::default(),
        Vec::new(),
        schedule,
        Vec::new(),
        Vec::new(),
        league,
    )
}

fn row<'a>(table: &'a [Standing], team: &str) -> &'a Standing {
    table
        .iter()
        .find(|s| s.team == team)
        .unwrap_or_else(|| panic!("{team} should be in the table"))
}

fn teams(table: &[Standing]) -> Vec<&str> {
    table.iter().map(|s| s.team.as_str()).collect()
}

#[test]
fn win_and_draw_give_four_points() {
    let repo = repo_with(
        vec![
            league_match("1R", "2024.03.06", "A", "B", (2, 1)),
            league_match("2R", "2024.03.13", "A", "C", (1, 1)),
        ],
        Vec::new(),
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    let a = row(&table, "A");
    assert_eq!(a.played, 2);
    assert_eq!(a.points, 4);
    assert_eq!(a.goal_difference, 1);
    assert_eq!((a.wins, a.draws, a.losses), (1, 1, 0));
    assert_eq!(teams(&table), vec!["A", "C", "B"]);
}

#[test]
fn ties_break_on_goal_difference_then_goals_for() {
    let repo = repo_with(
        vec![
            league_match("1R", "2024.03.06", "P", "Q", (3, 0)),
            league_match("1R", "2024.03.06", "R", "S", (1, 0)),
            league_match("1R", "2024.03.06", "T", "U", (2, 1)),
        ],
        Vec::new(),
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    assert_eq!(teams(&table), vec!["P", "T", "R", "U", "S", "Q"]);
}

#[test]
fn schedule_rows_fill_gaps_in_the_league_sheet() {
    let repo = repo_with(
        vec![league_match("1R", "2024.03.06", "수 야간", "목요일", (3, 1))],
        vec![
            schedule_row("1R", "2024.03.06", "목요일", "3:1"),
            schedule_row("2R", "2024.03.13", "금야간", "1:1"),
            schedule_row("3R", "2024.03.20", "화요일", ""),
        ],
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    let own = row(&table, "수 야간");
    assert_eq!(own.played, 2);
    assert_eq!(own.points, 4);
    assert_eq!(row(&table, "금 야간").draws, 1);
    assert!(table.iter().all(|s| s.team != "화요일"));
}

#[test]
fn repeated_id_in_another_season_is_a_different_fixture() {
    let mut last_season = league_match("1R", "2023.03.08", "수 야간", "목요일", (1, 0));
    last_season.season = "2023".to_string();
    let repo = repo_with(
        vec![last_season],
        vec![schedule_row("1R", "2024.03.06", "화요일", "2:0")],
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    let own = row(&table, "수 야간");
    assert_eq!(own.played, 2);
    assert_eq!(own.points, 6);
    assert_eq!(row(&table, "목요일").played, 1);
    assert_eq!(row(&table, "화요일").played, 1);
}

#[test]
fn annotated_schedule_result_uses_the_written_score() {
    let repo = repo_with(
        Vec::new(),
        vec![schedule_row("1R", "2024.03.06", "목요일", "2연승 3:1")],
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    let own = row(&table, "수 야간");
    assert_eq!((own.goals_for, own.goals_against), (3, 1));
    assert_eq!(own.wins, 1);
}

#[test]
fn same_day_fixture_under_another_id_counts_once() {
    let repo = repo_with(
        vec![league_match("L-7", "2024.03.06", "목요일", "수 야간", (0, 2))],
        vec![schedule_row("1R", "2024-03-06", "목요일", "2:0")],
    );
    let table = compute_standings(&repo, &Selection::All, "리그");
    assert_eq!(row(&table, "수 야간").played, 1);
    assert_eq!(row(&table, "목요일").played, 1);
}

#[test]
fn league_sheet_decides_the_shootout() {
    let mut sheet = league_match("4강", "2024.05.01", "수 야간", "화요일", (1, 1));
    sheet.competition = "컵".to_string();
    sheet.penalty_winner = Some(Side::Away);
    let mut fixture = schedule_row("4강", "2024.05.01", "화요일", "1:1(PK 4:3)");
    fixture.competition = "컵".to_string();
    let repo = repo_with(vec![sheet], vec![fixture]);

    let table = compute_standings(&repo, &Selection::All, "컵");
    assert_eq!(row(&table, "화요일").wins, 1);
    assert_eq!(row(&table, "수 야간").losses, 1);
    assert_eq!(row(&table, "수 야간").played, 1);
}

#[test]
fn finalist_outranks_quarterfinal_winner_on_points() {
    let cup = |id: &str, home: &str, away: &str, score: (u32, u32)| {
        let mut m = league_match(id, "2024.05.01", home, away, score);
        m.competition = "컵".to_string();
        m
    };
    let repo = repo_with(
        vec![
            cup("8강", "Q", "R", (5, 0)),
            cup("8강-2", "Q", "S", (4, 0)),
            cup("결승", "F", "G", (0, 1)),
        ],
        Vec::new(),
    );
    let table = compute_standings(&repo, &Selection::All, "컵");
    assert_eq!(&teams(&table)[..2], &["G", "F"]);
    assert_eq!(row(&table, "Q").points, 6);
    assert_eq!(row(&table, "F").points, 0);
    assert_eq!(teams(&table)[2], "Q");
}

#[test]
fn recomputing_does_not_double_count() {
    let repo = fixture_repo();
    let first = compute_standings(&repo, &Selection::only("2024"), "리그");
    let second = compute_standings(&repo, &Selection::only("2024"), "리그");
    assert_eq!(first, second);
}

#[test]
fn fixture_league_table() {
    let repo = fixture_repo();
    let table = compute_standings(&repo, &Selection::only("2024"), "리그");
    assert_eq!(teams(&table), vec!["수 야간", "화요일", "목요일", "금 야간"]);

    let own = row(&table, "수 야간");
    assert_eq!(own.played, 4);
    assert_eq!((own.wins, own.draws, own.losses), (2, 1, 1));
    assert_eq!((own.goals_for, own.goals_against), (6, 4));
    assert_eq!(own.goal_difference, 2);
    assert_eq!(own.points, 7);

    let thursday = row(&table, "목요일");
    assert_eq!(thursday.played, 3);
    assert_eq!(thursday.goal_difference, -3);
    assert_eq!(thursday.points, 3);

    assert_eq!(row(&table, "금 야간").points, 2);
}

#[test]
fn knockout_table_ranks_by_stage_first() {
    let repo = fixture_repo();
    let table = compute_standings(&repo, &Selection::only("2024"), "컵");
    assert_eq!(teams(&table), vec!["목요일", "수 야간", "화요일", "금 야간"]);

    let own = row(&table, "수 야간");
    assert_eq!(own.round_weight, 100);
    assert_eq!(own.played, 2);
    assert_eq!(own.points, 3);
    assert_eq!(row(&table, "화요일").round_weight, 50);
}

#[test]
fn unknown_competition_yields_empty_table() {
    let repo = fixture_repo();
    assert!(compute_standings(&repo, &Selection::All, "친선").is_empty());
}
