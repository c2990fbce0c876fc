use serde::{Deserialize, Serialize};

pub use swipematch_core::{
    Archetype, ArchetypeRule, EngineConfig, PartialCard, PoolTemplate, SynthFallbacks,
};

/// Archetype defaults as stored on disk. The image is named by a seed and
/// resolved against the job image pool at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeDef {
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
    #[serde(default)]
    pub image_seed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub fallback: Archetype,
    pub rules: Vec<ArchetypeRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageManifest {
    pub jobs: Vec<String>,
    #[serde(default)]
    pub avatars: Vec<String>,
}

/// Optional overrides for the procedural pools and last-resort text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSettings {
    #[serde(default)]
    pub curated: Option<PoolTemplate>,
    #[serde(default)]
    pub global: Option<PoolTemplate>,
    #[serde(default)]
    pub fallbacks: Option<SynthFallbacks>,
}
