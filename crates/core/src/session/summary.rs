use crate::{Archetype, CandidateCard};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const SKILL_SUMMARY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLine {
    pub title: String,
    pub archetype: Archetype,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub matches: Vec<MatchLine>,
    /// Unique skills across matches, first occurrence order.
    pub skills: Vec<String>,
}

pub fn summarize(matches: &[CandidateCard], skill_limit: usize) -> MatchSummary {
    let mut seen = HashSet::new();
    let skills = matches
        .iter()
        .flat_map(|card| card.skills.iter())
        .filter(|skill| seen.insert(skill.as_str()))
        .take(skill_limit)
        .cloned()
        .collect();
    MatchSummary {
        matches: matches
            .iter()
            .map(|card| MatchLine {
                title: card.title.clone(),
                archetype: card.archetype,
            })
            .collect(),
        skills,
    }
}
