use crate::schema::{ArchetypeDef, ImageManifest, PoolSettings, RuleSet};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use swipematch_core::{
    ArchetypeProfile, ArchetypeRules, ArchetypeTable, Catalog, EngineConfig, ImagePool,
    PartialCard, PoolTemplate, SynthFallbacks,
};
use tracing::debug;

const JOBS_FILE: &str = "jobs.json";
const ARCHETYPES_FILE: &str = "archetypes.json";
const CURATED_FILE: &str = "curated_titles.json";
const IMAGES_FILE: &str = "images.json";
const RULES_FILE: &str = "archetype_rules.json";
const POOLS_FILE: &str = "pools.json";
const ENGINE_FILE: &str = "engine.json";

macro_rules! builtin_asset {
    ($file:literal) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/", $file))
    };
}

/// A validated catalog plus the avatar choices offered during setup.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub avatars: Vec<String>,
}

struct CatalogSources<'a> {
    jobs: &'a [u8],
    archetypes: &'a [u8],
    curated: &'a [u8],
    images: &'a [u8],
    rules: &'a [u8],
    pools: Option<&'a [u8]>,
}

/// The catalog compiled into the binary from the workspace `assets/` dir.
pub fn builtin_catalog() -> LoadedCatalog {
    parse_catalog(CatalogSources {
        jobs: builtin_asset!("jobs.json"),
        archetypes: builtin_asset!("archetypes.json"),
        curated: builtin_asset!("curated_titles.json"),
        images: builtin_asset!("images.json"),
        rules: builtin_asset!("archetype_rules.json"),
        pools: None,
    })
    .expect("built-in catalog must be valid")
}

pub fn builtin_engine_config() -> EngineConfig {
    parse_json::<EngineConfig>(builtin_asset!("engine.json"), ENGINE_FILE)
        .expect("built-in engine.json must be valid")
}

pub fn load_catalog(dir: &Path) -> anyhow::Result<LoadedCatalog> {
    let jobs = read(dir.join(JOBS_FILE))?;
    let archetypes = read(dir.join(ARCHETYPES_FILE))?;
    let curated = read(dir.join(CURATED_FILE))?;
    let images = read(dir.join(IMAGES_FILE))?;
    let rules = read(dir.join(RULES_FILE))?;
    let pools_path = dir.join(POOLS_FILE);
    let pools = if pools_path.exists() {
        Some(read(pools_path)?)
    } else {
        None
    };
    parse_catalog(CatalogSources {
        jobs: &jobs,
        archetypes: &archetypes,
        curated: &curated,
        images: &images,
        rules: &rules,
        pools: pools.as_deref(),
    })
    .with_context(|| format!("load catalog from {}", dir.display()))
}

/// Reads `engine.json` when the directory has one, defaults otherwise.
pub fn load_engine_config(dir: &Path) -> anyhow::Result<EngineConfig> {
    let path = dir.join(ENGINE_FILE);
    let config = if path.exists() {
        let raw = read(&path)?;
        parse_json::<EngineConfig>(&raw, &path.display().to_string())?
    } else {
        EngineConfig::default()
    };
    if let Err(reason) = config.validate() {
        bail!("invalid {}: {reason}", path.display());
    }
    Ok(config)
}

fn parse_catalog(sources: CatalogSources<'_>) -> anyhow::Result<LoadedCatalog> {
    let jobs: Vec<PartialCard> = parse_json(sources.jobs, JOBS_FILE)?;
    let archetype_defs: Vec<ArchetypeDef> = parse_json(sources.archetypes, ARCHETYPES_FILE)?;
    let curated_titles: Vec<String> = parse_json(sources.curated, CURATED_FILE)?;
    let images: ImageManifest = parse_json(sources.images, IMAGES_FILE)?;
    let rule_set: RuleSet = parse_json(sources.rules, RULES_FILE)?;
    let pools: PoolSettings = match sources.pools {
        Some(bytes) => parse_json(bytes, POOLS_FILE)?,
        None => PoolSettings::default(),
    };

    let images_pool = ImagePool::new(images.jobs);
    let profiles = archetype_defs
        .into_iter()
        .map(|def| resolve_profile(def, &images_pool))
        .collect();

    let mut catalog = Catalog {
        primary: Vec::new(),
        curated_titles: curated_titles
            .into_iter()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .collect(),
        rules: ArchetypeRules::new(rule_set.rules, rule_set.fallback),
        archetypes: ArchetypeTable::new(profiles),
        images: images_pool,
        fallbacks: pools.fallbacks.unwrap_or_default(),
        curated_template: pools.curated.unwrap_or_else(PoolTemplate::curated),
        global_template: pools.global.unwrap_or_else(PoolTemplate::global),
    };
    let synth = catalog.synth();
    let primary = jobs
        .into_iter()
        .enumerate()
        .map(|(index, partial)| synth.synthesize(partial, index))
        .collect();
    catalog.primary = primary;
    catalog.validate().context("validate catalog")?;

    debug!(
        primary = catalog.primary.len(),
        curated = catalog.curated_titles.len(),
        images = catalog.images.len(),
        "catalog loaded"
    );
    Ok(LoadedCatalog {
        catalog,
        avatars: images.avatars,
    })
}

fn resolve_profile(def: ArchetypeDef, images: &ImagePool) -> ArchetypeProfile {
    let image = def.image.filter(|url| !url.trim().is_empty()).or_else(|| {
        def.image_seed
            .as_deref()
            .and_then(|seed| images.pick_for_seed(seed))
            .map(str::to_string)
    });
    ArchetypeProfile {
        archetype: def.archetype,
        bio: def.bio,
        skills: def.skills,
        compatibility: def.compatibility,
        fun_fact: def.fun_fact,
        image,
    }
}

fn read(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8], label: &str) -> anyhow::Result<T> {
    serde_json::from_slice(bytes).with_context(|| format!("parse {label}"))
}
