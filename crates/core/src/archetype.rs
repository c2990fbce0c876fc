use crate::Archetype;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeRule {
    pub keywords: Vec<String>,
    pub archetype: Archetype,
}

/// Ordered keyword table mapping a role title to an archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeRules {
    pub rules: Vec<ArchetypeRule>,
    pub fallback: Archetype,
}

impl ArchetypeRules {
    pub fn new(rules: Vec<ArchetypeRule>, fallback: Archetype) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| ArchetypeRule {
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|keyword| keyword.trim().to_lowercase())
                    .filter(|keyword| !keyword.is_empty())
                    .collect(),
                archetype: rule.archetype,
            })
            .collect();
        Self { rules, fallback }
    }

    /// Case-insensitive substring match, first rule wins. Total: titles that
    /// match nothing resolve to the fallback.
    pub fn resolve(&self, title: &str) -> Archetype {
        let title = title.to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| !keyword.is_empty() && title.contains(&keyword.to_lowercase()))
            })
            .map(|rule| rule.archetype)
            .unwrap_or(self.fallback)
    }
}

/// Narrative defaults used to fill sparse cards of one archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeProfile {
    pub archetype: Archetype,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, rename = "loveLanguage")]
    pub compatibility: Vec<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArchetypeTable {
    profiles: HashMap<Archetype, ArchetypeProfile>,
}

impl ArchetypeTable {
    pub fn new(profiles: Vec<ArchetypeProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.archetype, profile))
            .collect();
        Self { profiles }
    }

    pub fn get(&self, archetype: Archetype) -> Option<&ArchetypeProfile> {
        self.profiles.get(&archetype)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn missing(&self) -> Vec<Archetype> {
        Archetype::ALL
            .into_iter()
            .filter(|archetype| !self.profiles.contains_key(archetype))
            .collect()
    }
}
