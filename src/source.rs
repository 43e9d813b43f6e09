//! Retrieval of the five sheet texts. Sits outside the aggregation core: the
//! core only ever sees a finished [`SourceTexts`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use thiserror::Error;

use crate::config::SourceConfig;
use crate::http_cache::fetch_text_cached;
use crate::http_client::http_client;
use crate::repository::SourceTexts;

/// Any retrieval failure. Callers surface this as a single "data
/// unavailable" state; `source_name` names the sheet for logs.
#[derive(Debug, Error)]
#[error("data unavailable ({source_name})")]
pub struct DataUnavailable {
    pub source_name: &'static str,
}

pub fn fetch_sources(cfg: &SourceConfig) -> Result<SourceTexts> {
    let client = http_client()?;
    let fetch = |name: &'static str, url: &str| -> Result<String> {
        if url.trim().is_empty() {
            return Ok(String::new());
        }
        fetch_text_cached(client, url).with_context(|| {
            warn!("{name} sheet fetch failed: {url}");
            DataUnavailable { source_name: name }
        })
    };
    Ok(SourceTexts {
        roster: fetch("roster", &cfg.roster_url)?,
        schedule: fetch("schedule", &cfg.schedule_url)?,
        records: fetch("records", &cfg.records_url)?,
        stadiums: fetch("stadiums", &cfg.stadiums_url)?,
        league: fetch("league", &cfg.league_url)?,
    })
}

/// Reads `roster.csv`, `schedule.csv`, `records.csv`, `stadiums.csv` and
/// `league.csv` from `dir`. A missing league file reads as empty.
pub fn load_sources_from_dir(dir: &Path) -> Result<SourceTexts> {
    let read = |name: &'static str, file: &str| -> Result<String> {
        let path = dir.join(file);
        fs::read_to_string(&path).with_context(|| {
            warn!("{name} sheet missing at {}", path.display());
            DataUnavailable { source_name: name }
        })
    };
    let league_path = dir.join("league.csv");
    let league = if league_path.exists() {
        read("league", "league.csv")?
    } else {
        String::new()
    };
    Ok(SourceTexts {
        roster: read("roster", "roster.csv")?,
        schedule: read("schedule", "schedule.csv")?,
        records: read("records", "records.csv")?,
        stadiums: read("stadiums", "stadiums.csv")?,
        league,
    })
}

/// True when `err` came from retrieval rather than from wiring.
pub fn is_data_unavailable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DataUnavailable>().is_some()
}
