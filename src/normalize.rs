use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use thiserror::Error;

// Legacy sheet codes and long-form names that refer to one of the canonical
// "weekday daypart" teams.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("T.TUE", "화요일"),
    ("T.MWE", "수 오전"),
    ("T.WED", "수 야간"),
    ("T.THU", "목요일"),
    ("T.MFR", "금 오전"),
    ("T.FRI", "금 야간"),
    ("T.SAT", "토요일"),
    ("T.SUN", "일요일"),
    ("수요일", "수 야간"),
    ("금요일", "금 야간"),
    ("금 이긴", "금 야간"),
];

static WEEKDAY_DAYPART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<day>[월화수목금토일])(?P<part>오전|야간)").expect("valid regex"));

// Regulation score, then an optional shootout in parentheses labelled `PK`
// before or after the numbers.
const SCORE_PATTERN: &str = r"(?P<home>[0-9]+)\s*:\s*(?P<away>[0-9]+)(?:\s*\(\s*(?:PK\s*)?(?P<pk_home>[0-9]+)\s*:\s*(?P<pk_away>[0-9]+)\s*(?:PK\s*)?\))?";

static SCORE_AT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^\s*{SCORE_PATTERN}")).expect("valid regex"));
static SCORE_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i){SCORE_PATTERN}")).expect("valid regex"));
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[0-9]").expect("valid regex"));
static TOKEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,/().]+").expect("valid regex"));

const WIN_WORDS: &[&str] = &["승", "WIN"];
const WIN_LETTERS: &[&str] = &["W", "O"];
const DRAW_WORDS: &[&str] = &["무", "DRAW", "△"];
const DRAW_LETTERS: &[&str] = &["D", "-"];
const LOSS_WORDS: &[&str] = &["패", "LOSS", "LOSE"];
const LOSS_LETTERS: &[&str] = &["L", "X"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
    pub penalty_winner: Option<Side>,
}

impl Score {
    /// Outcome from the home side's point of view. The shootout only decides
    /// a regulation draw.
    pub fn outcome(&self) -> Outcome {
        if self.home > self.away {
            return Outcome::Win;
        }
        if self.home < self.away {
            return Outcome::Loss;
        }
        match self.penalty_winner {
            Some(Side::Home) => Outcome::Win,
            Some(Side::Away) => Outcome::Loss,
            None => Outcome::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score has no ':' separator")]
    MissingSeparator,
    #[error("home score is not a number")]
    InvalidHome,
    #[error("away score is not a number")]
    InvalidAway,
}

pub fn normalize_team_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut name = match TEAM_ALIASES.iter().find(|(code, _)| *code == trimmed) {
        Some((_, canonical)) => (*canonical).to_string(),
        None => split_weekday_daypart(trimmed),
    };
    // Known sheet typo.
    if name == "일요일일" {
        name = "일요일".to_string();
    }
    name
}

/// Inserts the missing space in compact names such as `금야간`.
fn split_weekday_daypart(name: &str) -> String {
    WEEKDAY_DAYPART.replace_all(name, "$day $part").into_owned()
}

/// Parses `"H:A"` with an optional shootout suffix `"(P:P)"`.
///
/// Whitespace around the colons and parentheses is ignored. The shootout
/// segment may carry a `PK` label on either side of the numbers. A shootout
/// that cannot be read, or ends level, leaves `penalty_winner` unset without
/// failing the regulation score.
pub fn parse_score_expression(text: &str) -> Result<Score, ScoreError> {
    match SCORE_AT_START.captures(text) {
        Some(caps) => score_from_captures(&caps),
        None => Err(score_failure(text)),
    }
}

/// Like [`parse_score_expression`], but finds the first `H:A` anywhere in
/// the text, so annotation around the score (`"2연승 3:1"`) is ignored.
pub fn find_score(text: &str) -> Result<Score, ScoreError> {
    match SCORE_ANYWHERE.captures(text) {
        Some(caps) => score_from_captures(&caps),
        None => Err(score_failure(text)),
    }
}

fn score_from_captures(caps: &Captures<'_>) -> Result<Score, ScoreError> {
    let home = capture_number(caps, "home").ok_or(ScoreError::InvalidHome)?;
    let away = capture_number(caps, "away").ok_or(ScoreError::InvalidAway)?;
    let penalty_winner = match (capture_number(caps, "pk_home"), capture_number(caps, "pk_away")) {
        (Some(h), Some(a)) if h > a => Some(Side::Home),
        (Some(h), Some(a)) if a > h => Some(Side::Away),
        _ => None,
    };
    Ok(Score {
        home,
        away,
        penalty_winner,
    })
}

fn capture_number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse::<u32>().ok()
}

/// Names the side of the colon that failed to read as a number.
fn score_failure(text: &str) -> ScoreError {
    let Some((home, _)) = text.split_once(':') else {
        return ScoreError::MissingSeparator;
    };
    if LEADING_NUMBER.is_match(home) {
        ScoreError::InvalidAway
    } else {
        ScoreError::InvalidHome
    }
}

/// Reads a result cell that may be narrative (`"승"`, `"LOSS"`, `"D"`) or a
/// score. Returns `None` when neither reading applies.
pub fn classify_result_text(text: &str) -> Option<Outcome> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(outcome) = keyword_outcome(trimmed) {
        return Some(outcome);
    }
    find_score(trimmed).ok().map(|score| score.outcome())
}

fn keyword_outcome(text: &str) -> Option<Outcome> {
    let upper = text.to_uppercase();
    let tokens: Vec<&str> = TOKEN_BREAK
        .split(&upper)
        .filter(|t| !t.is_empty())
        .collect();
    let hit = |words: &[&str], letters: &[&str]| {
        words.iter().any(|w| upper.contains(w)) || tokens.iter().any(|t| letters.contains(t))
    };
    if hit(WIN_WORDS, WIN_LETTERS) {
        Some(Outcome::Win)
    } else if hit(DRAW_WORDS, DRAW_LETTERS) {
        Some(Outcome::Draw)
    } else if hit(LOSS_WORDS, LOSS_LETTERS) {
        Some(Outcome::Loss)
    } else {
        None
    }
}

/// Sheet dates are written `YYYY.MM.DD`.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y.%m.%d").ok()
}
