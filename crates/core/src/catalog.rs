use crate::{
    Archetype, ArchetypeRules, ArchetypeTable, Audience, CandidateCard, CardSynth, ImagePool,
    PartialCard, Program, SynthFallbacks,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate card id '{0}'")]
    DuplicateId(String),
    #[error("card '{id}' is missing {fields:?}")]
    IncompleteCard { id: String, fields: Vec<&'static str> },
    #[error("image pool is empty")]
    EmptyImagePool,
    #[error("no defaults for archetypes {0:?}")]
    MissingArchetypes(Vec<Archetype>),
    #[error("card id '{id}' uses the reserved pool prefix '{prefix}-'")]
    ReservedId { id: String, prefix: String },
}

/// Shared text stamped onto every card of a procedural pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolTemplate {
    pub id_prefix: String,
    pub location: String,
    pub looking_for: String,
    pub swipe_right_if: Vec<String>,
    pub tags: Vec<String>,
}

impl PoolTemplate {
    pub fn curated() -> Self {
        Self {
            id_prefix: "spec".to_string(),
            location: "Career Fest Hub".to_string(),
            looking_for: "Ambitious professionals ready to lead and innovate.".to_string(),
            swipe_right_if: vec!["Impact".to_string()],
            tags: vec!["Curated".to_string()],
        }
    }

    pub fn global() -> Self {
        Self {
            id_prefix: "global".to_string(),
            location: "Global Discovery".to_string(),
            looking_for: "High-caliber talent with a drive for technical excellence.".to_string(),
            swipe_right_if: vec!["Success".to_string()],
            tags: vec!["Discovery".to_string()],
        }
    }

    fn stamp(&self, id: String, title: String, archetype: Option<Archetype>) -> PartialCard {
        PartialCard {
            id: Some(id),
            title,
            audience: Some(Audience::Any),
            archetype: archetype.map(|archetype| archetype.label().to_string()),
            location: Some(self.location.clone()),
            looking_for: Some(self.looking_for.clone()),
            swipe_right_if: self.swipe_right_if.clone(),
            tags: self.tags.clone(),
            ..PartialCard::default()
        }
    }
}

/// Read-only card sources handed to every session. Nothing here mutates
/// after construction, so one catalog can back any number of sessions.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub primary: Vec<CandidateCard>,
    pub curated_titles: Vec<String>,
    pub rules: ArchetypeRules,
    pub archetypes: ArchetypeTable,
    pub images: ImagePool,
    pub fallbacks: SynthFallbacks,
    pub curated_template: PoolTemplate,
    pub global_template: PoolTemplate,
}

impl Catalog {
    pub fn synth(&self) -> CardSynth<'_> {
        CardSynth {
            rules: &self.rules,
            archetypes: &self.archetypes,
            images: &self.images,
            fallbacks: &self.fallbacks,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.images.is_empty() {
            return Err(CatalogError::EmptyImagePool);
        }
        let missing = self.archetypes.missing();
        if !missing.is_empty() {
            return Err(CatalogError::MissingArchetypes(missing));
        }
        let reserved = [
            &self.curated_template.id_prefix,
            &self.global_template.id_prefix,
        ];
        let mut ids = HashSet::new();
        for card in &self.primary {
            if !ids.insert(card.id.as_str()) {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
            if let Some(prefix) = reserved
                .iter()
                .find(|prefix| card.id.starts_with(&format!("{prefix}-")))
            {
                return Err(CatalogError::ReservedId {
                    id: card.id.clone(),
                    prefix: prefix.to_string(),
                });
            }
            let fields = card.missing_fields();
            if !fields.is_empty() {
                return Err(CatalogError::IncompleteCard {
                    id: card.id.clone(),
                    fields,
                });
            }
        }
        Ok(())
    }

    /// Primary cards tagged for `program` or for every program.
    pub fn primary_for(&self, program: Program) -> Vec<CandidateCard> {
        self.primary
            .iter()
            .filter(|card| card.audience.admits(program))
            .cloned()
            .collect()
    }

    /// Primary cards tagged for a different program; wildcards excluded.
    pub fn primary_elsewhere(&self, program: Program) -> Vec<CandidateCard> {
        self.primary
            .iter()
            .filter(|card| !card.audience.is_wildcard() && !card.audience.admits(program))
            .cloned()
            .collect()
    }

    pub fn card_by_id(&self, id: &str) -> Option<&CandidateCard> {
        self.primary.iter().find(|card| card.id == id)
    }

    /// Every curated title expanded into a full card, in title order.
    pub fn curated_pool(&self) -> Vec<CandidateCard> {
        let synth = self.synth();
        self.curated_titles
            .iter()
            .enumerate()
            .map(|(index, title)| {
                let id = format!("{}-{index}", self.curated_template.id_prefix);
                let partial = self.curated_template.stamp(id, title.clone(), None);
                synth.synthesize(partial, index)
            })
            .collect()
    }

    /// `size` cards cycling the archetype order. `first_variant` is 1-based
    /// and keeps counting across batches, so ids never repeat.
    pub fn global_batch(&self, first_variant: u64, size: usize) -> Vec<CandidateCard> {
        let synth = self.synth();
        (0..size as u64)
            .map(|offset| {
                let variant = first_variant.max(1) + offset;
                let slot = (variant - 1) as usize;
                let archetype = Archetype::ALL[slot % Archetype::ALL.len()];
                let id = format!("{}-{variant}", self.global_template.id_prefix);
                let title = format!("{} Specialist - Variant {variant}", archetype.short_name());
                let partial = self.global_template.stamp(id, title, Some(archetype));
                synth.synthesize(partial, slot)
            })
            .collect()
    }
}
