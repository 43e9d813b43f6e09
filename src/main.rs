use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use log::error;
use serde::Serialize;

use squad_ledger::config::{Rules, SourceConfig};
use squad_ledger::match_events::link_match_events;
use squad_ledger::model::Selection;
use squad_ledger::player_history::{EventKind, player_events, player_match_history};
use squad_ledger::player_stats::{StatsFilter, compute_stats};
use squad_ledger::repository::Repository;
use squad_ledger::source::{fetch_sources, is_data_unavailable, load_sources_from_dir};
use squad_ledger::standings::compute_standings;
use squad_ledger::team_record::{opponent_breakdown, stadium_breakdown, team_record};

const DEFAULT_STANDINGS_COMPETITION: &str = "리그";

const USAGE: &str = "usage: squad_ledger [--dir <path>] [--season <s>] [--competition <c>] \
<standings|stats|team|stadiums|opponents|seasons|competitions|schedule|records|links|events|history> \
[--match <id>] [--player <name>] [--kind <event>]";

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_data_unavailable(&err) => {
            error!("{err:#}");
            println!("data unavailable");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = subcommand(&args).ok_or_else(|| anyhow!(USAGE))?;
    let season = Selection::from_arg(&flag_value(&args, "season").unwrap_or_default());
    let competition = Selection::from_arg(&flag_value(&args, "competition").unwrap_or_default());

    let texts = match flag_value(&args, "dir") {
        Some(dir) => load_sources_from_dir(&PathBuf::from(dir))?,
        None => fetch_sources(&SourceConfig::from_env())?,
    };
    let repo = Repository::from_sources(&texts, Rules::from_env());
    let as_of = chrono::Local::now().date_naive();

    match command.as_str() {
        "standings" => {
            let name = match &competition {
                Selection::Only(name) => name.as_str(),
                Selection::All => DEFAULT_STANDINGS_COMPETITION,
            };
            print_json(&compute_standings(&repo, &season, name))
        }
        "stats" => {
            let filter = StatsFilter {
                season,
                competition,
                as_of,
            };
            print_json(&compute_stats(&repo, &filter))
        }
        "team" => print_json(&team_record(&repo, &season, &competition, as_of)),
        "stadiums" => print_json(&stadium_breakdown(&repo, &season, &competition, as_of)),
        "opponents" => print_json(&opponent_breakdown(&repo, &season, &competition, as_of)),
        "seasons" => print_json(&repo.available_seasons()),
        "competitions" => print_json(&repo.available_competitions()),
        "schedule" => print_json(&repo.schedule(&season)),
        "records" => {
            let (season, match_id) = match_key(&args, &season)?;
            print_json(&repo.match_records(&season, &match_id))
        }
        "links" => {
            let (season, match_id) = match_key(&args, &season)?;
            print_json(&link_match_events(&repo, &season, &match_id))
        }
        "events" => {
            let player = flag_value(&args, "player").context("--player is required")?;
            let raw_kind = flag_value(&args, "kind").unwrap_or_else(|| "goals".to_string());
            let kind = EventKind::from_label(&raw_kind)
                .ok_or_else(|| anyhow!("unknown event kind: {raw_kind}"))?;
            print_json(&player_events(&repo, &season, &competition, &player, kind))
        }
        "history" => {
            let player = flag_value(&args, "player").context("--player is required")?;
            print_json(&player_match_history(&repo, &player, &season))
        }
        other => Err(anyhow!("unknown command: {other}\n{USAGE}")),
    }
}

/// A single match needs a concrete season next to its id.
fn match_key(args: &[String], season: &Selection) -> Result<(String, String)> {
    let match_id = flag_value(args, "match").context("--match is required")?;
    let Selection::Only(season) = season else {
        return Err(anyhow!("--season is required with --match"));
    };
    Ok((season.clone(), match_id))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

/// Accepts both `--name=value` and `--name value`.
fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefixed = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefixed) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

/// First bare word that is not the value of a preceding `--flag`.
fn subcommand(args: &[String]) -> Option<String> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = !arg.contains('=');
            continue;
        }
        return Some(arg.clone());
    }
    None
}
