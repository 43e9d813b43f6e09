const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRGGWFn467-3HymL_GgM6kifS1veoPDSgCG47Za6sO94ZJr8n9PzmL-h_aVCo7e59gbPhVbkfHJtEA9/pub";

const DEFAULT_OWN_TEAM: &str = "수 야간";
const DEFAULT_PRACTICE_LABEL: &str = "연습경기";
const DEFAULT_KNOCKOUT_TOKENS: &[&str] = &["컵", "플레이오프", "플옵"];
const DEFAULT_COMPETITION_ORDER: &[&str] = &["리그", "컵", "플레이오프", "플옵", "연습경기"];
const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Domain constants shared by every query over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Canonical name of the team that keeps the weekly schedule sheet.
    pub own_team: String,
    pub practice_label: String,
    pub knockout_tokens: Vec<String>,
    pub competition_order: Vec<String>,
    pub leaderboard_size: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            own_team: DEFAULT_OWN_TEAM.to_string(),
            practice_label: DEFAULT_PRACTICE_LABEL.to_string(),
            knockout_tokens: DEFAULT_KNOCKOUT_TOKENS.iter().map(|s| s.to_string()).collect(),
            competition_order: DEFAULT_COMPETITION_ORDER
                .iter()
                .map(|s| s.to_string())
                .collect(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl Rules {
    pub fn from_env() -> Self {
        let mut rules = Self::default();
        if let Some(team) = env_non_empty("OWN_TEAM") {
            rules.own_team = crate::normalize::normalize_team_name(&team);
        }
        rules.leaderboard_size = std::env::var("LEADERBOARD_SIZE")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
            .max(1);
        rules
    }

    pub fn is_knockout(&self, competition: &str) -> bool {
        self.knockout_tokens
            .iter()
            .any(|token| competition.contains(token.as_str()))
    }
}

/// Where the five sheets are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub roster_url: String,
    pub schedule_url: String,
    pub records_url: String,
    pub stadiums_url: String,
    /// Empty when no league sheet is published.
    pub league_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            roster_url: sheet_url(0),
            schedule_url: sheet_url(2105782746),
            records_url: sheet_url(426357573),
            stadiums_url: sheet_url(1733505023),
            league_url: sheet_url(1902200783),
        }
    }
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            roster_url: env_non_empty("SHEET_ROSTER_URL").unwrap_or(defaults.roster_url),
            schedule_url: env_non_empty("SHEET_SCHEDULE_URL").unwrap_or(defaults.schedule_url),
            records_url: env_non_empty("SHEET_RECORDS_URL").unwrap_or(defaults.records_url),
            stadiums_url: env_non_empty("SHEET_STADIUMS_URL").unwrap_or(defaults.stadiums_url),
            // Set but blank turns the league sheet off.
            league_url: match std::env::var("SHEET_LEAGUE_URL") {
                Ok(raw) => raw.trim().to_string(),
                Err(_) => defaults.league_url,
            },
        }
    }
}

fn sheet_url(gid: u64) -> String {
    format!("{SHEET_BASE}?gid={gid}&single=true&output=csv")
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knockout_detection_uses_substrings() {
        let rules = Rules::default();
        assert!(rules.is_knockout("컵"));
        assert!(rules.is_knockout("TFC 컵"));
        assert!(rules.is_knockout("플옵"));
        assert!(!rules.is_knockout("리그"));
    }

    #[test]
    fn default_urls_point_at_csv_exports() {
        let cfg = SourceConfig::default();
        assert!(cfg.roster_url.ends_with("gid=0&single=true&output=csv"));
        assert!(cfg.league_url.contains("gid=1902200783"));
    }
}
