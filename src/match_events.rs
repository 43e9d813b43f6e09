use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::repository::Repository;

static GOAL_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[Gg](?P<num>[0-9]+)").expect("valid regex"));

/// One goal in a match. `assister` stays `None` when the scorer's note has
/// no tag for this goal or nobody else carries the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalEvent {
    pub scorer: String,
    pub assister: Option<String>,
    pub tag: Option<String>,
}

/// Pairs scorers with assisters through `G<n>` tags written in the notes of
/// both records. The i-th goal of a record uses the i-th tag in its note.
pub fn link_match_events(repo: &Repository, season: &str, match_id: &str) -> Vec<GoalEvent> {
    let records = repo.match_records(season, match_id);
    let tags: Vec<Vec<String>> = records.iter().map(|r| goal_tags(&r.note)).collect();

    let mut events = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        for goal in 0..record.scored() as usize {
            let tag = tags[idx].get(goal).cloned();
            let assister = tag.as_deref().and_then(|tag| {
                records
                    .iter()
                    .zip(&tags)
                    .find(|(partner, partner_tags)| {
                        partner.name != record.name && partner_tags.iter().any(|t| t == tag)
                    })
                    .map(|(partner, _)| partner.name.clone())
            });
            events.push(GoalEvent {
                scorer: record.name.clone(),
                assister,
                tag,
            });
        }
    }
    events
}

/// `G` followed by digits, in order of appearance, upper-cased.
pub fn goal_tags(note: &str) -> Vec<String> {
    GOAL_TAG
        .captures_iter(note)
        .map(|caps| format!("G{}", &caps["num"]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::goal_tags;

    #[test]
    fn goal_tags_are_extracted_in_order() {
        assert_eq!(goal_tags("G1, g2 헤딩"), vec!["G1", "G2"]);
        assert_eq!(goal_tags("A1 G10"), vec!["G10"]);
        assert!(goal_tags("Goal").is_empty());
        assert!(goal_tags("").is_empty());
        assert_eq!(goal_tags("g12/G3"), vec!["G12", "G3"]);
    }
}
